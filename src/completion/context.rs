//! Completion request context
//!
//! Describes where a new child element is being inserted: the parent
//! element, the element siblings before the insertion point and whatever
//! part of the new tag name has been typed already.

/// Insertion point of a new child element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    /// Element whose content is being edited
    pub parent: String,

    /// Element siblings preceding the insertion point, oldest first
    pub siblings: Vec<String>,

    /// Partially typed tag name
    pub prefix: String,
}

impl CompletionContext {
    /// Create a context for inserting the first child of `parent`
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            siblings: Vec::new(),
            prefix: String::new(),
        }
    }

    /// Set the preceding siblings
    pub fn with_siblings<I, S>(mut self, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.siblings = siblings.into_iter().map(Into::into).collect();
        self
    }

    /// Set the typed prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Whether a name matches the typed prefix
    pub fn matches(&self, name: &str, case_sensitive: bool) -> bool {
        if self.prefix.is_empty() {
            return true;
        }
        if case_sensitive {
            name.starts_with(&self.prefix)
        } else {
            name.to_lowercase()
                .starts_with(&self.prefix.to_lowercase())
        }
    }
}
