//! Classification of raw `<!ELEMENT>` content specifications

use serde::Serialize;

/// Content specification of one declared element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "model", rename_all = "lowercase")]
pub enum ContentSpec {
    /// `EMPTY`: no children at all
    Empty,
    /// `ANY`: any declared element, in any order
    Any,
    /// `(#PCDATA)` or `(#PCDATA)*`: text only
    Text,
    /// `(#PCDATA|a|b)*`: text interleaved with a choice of elements
    Mixed(String),
    /// Element content such as `(a,(b|c)+)`; also anything unrecognized,
    /// which is left for the model parser to reject
    Children(String),
}

impl ContentSpec {
    /// Classify the text between the element name and the closing `>`
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim();
        match text {
            "EMPTY" => return ContentSpec::Empty,
            "ANY" => return ContentSpec::Any,
            _ => {}
        }

        let Some(inner) = text.strip_prefix('(') else {
            return ContentSpec::Children(text.to_string());
        };
        let Some(after_marker) = inner.trim_start().strip_prefix("#PCDATA") else {
            return ContentSpec::Children(text.to_string());
        };

        let rest = after_marker.trim_start();
        if rest.starts_with(')') && matches!(rest[1..].trim(), "" | "*") {
            ContentSpec::Text
        } else {
            ContentSpec::Mixed(text.to_string())
        }
    }

    /// Grammar text to build an automaton from, `None` when there is none
    pub fn model_text(&self) -> Option<&str> {
        match self {
            ContentSpec::Mixed(text) | ContentSpec::Children(text) => Some(text),
            ContentSpec::Empty | ContentSpec::Any | ContentSpec::Text => None,
        }
    }

    /// Whether the element may contain child elements at all
    pub fn allows_children(&self) -> bool {
        !matches!(self, ContentSpec::Empty | ContentSpec::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(ContentSpec::classify("EMPTY"), ContentSpec::Empty);
        assert_eq!(ContentSpec::classify("  ANY "), ContentSpec::Any);
    }

    #[test]
    fn test_text_only() {
        assert_eq!(ContentSpec::classify("(#PCDATA)"), ContentSpec::Text);
        assert_eq!(ContentSpec::classify("( #PCDATA ) *"), ContentSpec::Text);
        assert!(!ContentSpec::Text.allows_children());
        assert_eq!(ContentSpec::Text.model_text(), None);
    }

    #[test]
    fn test_mixed() {
        let spec = ContentSpec::classify("(#PCDATA|em|strong)*");
        assert_eq!(spec, ContentSpec::Mixed("(#PCDATA|em|strong)*".to_string()));
        assert_eq!(spec.model_text(), Some("(#PCDATA|em|strong)*"));
        assert!(spec.allows_children());
    }

    #[test]
    fn test_children() {
        let spec = ContentSpec::classify(" (title,author+) ");
        assert_eq!(spec.model_text(), Some("(title,author+)"));
    }

    #[test]
    fn test_unrecognized_is_left_to_parser() {
        assert_eq!(
            ContentSpec::classify("title,author"),
            ContentSpec::Children("title,author".to_string())
        );
        assert_eq!(
            ContentSpec::classify("(#PCDATA) junk"),
            ContentSpec::Mixed("(#PCDATA) junk".to_string())
        );
    }
}
