//! Query facade over a set of element declarations
//!
//! [`DtdGrammar`] answers "which elements may be inserted here?" for one
//! parent element given the element siblings that precede the insertion
//! point. Content models are parsed lazily and cached in an injected
//! [`ModelCache`], so several grammars never share state.
//!
//! # Examples
//!
//! ```
//! use dtdhint::grammar::{DtdGrammar, Hint};
//!
//! let grammar = DtdGrammar::new();
//! grammar.declare("book", "(title,(author|editor)+,chapter*)");
//!
//! let hint = grammar.hint("book", ["title"]);
//! let names: Vec<&str> = match &hint {
//!     Hint::Candidates { candidates } => candidates.iter().collect(),
//!     other => panic!("no candidates: {other:?}"),
//! };
//! assert_eq!(names, vec!["author", "editor"]);
//! ```

mod cache;
mod declaration;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError};

use serde::Serialize;
use tracing::debug;

pub use cache::{Lookup, ModelCache, SharedModel};
pub use declaration::ContentSpec;

use crate::error::ModelError;
use crate::model::Evaluation;

/// Names that may be inserted next, as answered by a content model
///
/// Unsorted and possibly with duplicates when a name is reachable through
/// several alternatives; see [`unique_sorted`](Self::unique_sorted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Candidates {
    names: Vec<String>,
}

impl Candidates {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Candidates starting with `prefix`
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |name| name.starts_with(prefix))
    }

    /// Deduplicated, alphabetically sorted copy
    pub fn unique_sorted(&self) -> Vec<String> {
        self.iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl IntoIterator for Candidates {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl FromIterator<String> for Candidates {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Full answer of a hint query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Hint {
    /// No automaton: the element is undeclared (`spec` is `None`) or its
    /// declaration has no content model (`EMPTY`, `ANY`, `(#PCDATA)`)
    NoModel { spec: Option<ContentSpec> },
    /// The declared content model could not be parsed
    Unparseable { reason: String },
    /// The preceding siblings already violate the content model
    Invalid,
    /// Names that may come next; empty once the model is complete
    Candidates { candidates: Candidates },
}

impl Hint {
    /// The grammar-based candidates, `None` for every other outcome
    pub fn into_candidates(self) -> Option<Candidates> {
        match self {
            Hint::Candidates { candidates } => Some(candidates),
            _ => None,
        }
    }
}

/// Element declarations of one DTD with their cached content models
#[derive(Debug, Clone, Default)]
pub struct DtdGrammar {
    cache: Arc<ModelCache>,
}

impl DtdGrammar {
    /// Create a grammar with its own empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grammar over an existing cache
    ///
    /// A declaration scanner holding the same cache can keep registering
    /// elements while this grammar answers queries.
    pub fn with_cache(cache: Arc<ModelCache>) -> Self {
        Self { cache }
    }

    /// The underlying cache
    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    /// Register `<!ELEMENT element spec>`
    pub fn declare(&self, element: impl Into<String>, spec: &str) {
        self.cache.declare(element, ContentSpec::classify(spec));
    }

    /// Content specification declared for `element`
    pub fn declaration(&self, element: &str) -> Option<ContentSpec> {
        self.cache.spec(element)
    }

    /// Names of all declared elements, sorted
    pub fn declared_elements(&self) -> BTreeSet<String> {
        self.cache.elements()
    }

    /// Names that may follow `siblings` inside `element`
    ///
    /// `None` means no grammar-based hint is available: the element has no
    /// usable content model or the siblings already violate it. An empty
    /// answer means the content is complete.
    pub fn what_can_follow<T, S>(&self, element: &str, siblings: T) -> Option<Candidates>
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hint(element, siblings).into_candidates()
    }

    /// Evaluate `siblings` against the content model of `element`
    pub fn hint<T, S>(&self, element: &str, siblings: T) -> Hint
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let model = match self.cache.lookup(element) {
            Lookup::Undeclared => return Hint::NoModel { spec: None },
            Lookup::NoModel(spec) => return Hint::NoModel { spec: Some(spec) },
            Lookup::Unparseable(err) => {
                return Hint::Unparseable {
                    reason: unparseable_reason(&err),
                };
            }
            Lookup::Model(model) => model,
        };

        // Every query resets the automaton, so a poisoned lock holds nothing stale
        let mut model = model.lock().unwrap_or_else(PoisonError::into_inner);
        let hint = match model.evaluate(siblings) {
            Evaluation::Invalid => Hint::Invalid,
            Evaluation::Satisfied => Hint::Candidates {
                candidates: Candidates::default(),
            },
            Evaluation::Expecting(names) => Hint::Candidates {
                candidates: Candidates::new(names),
            },
        };
        debug!(element, hint = ?hint, "evaluated content model");
        hint
    }
}

fn unparseable_reason(err: &ModelError) -> String {
    match err {
        ModelError::MalformedContentModel { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
