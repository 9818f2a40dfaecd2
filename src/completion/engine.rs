//! Completion engine - turns facade answers into candidate lists
//!
//! The grammar answers with unsorted names that may repeat, or with no
//! answer at all. The engine applies the fallbacks, deduplicates, filters
//! by the typed prefix and orders what is left.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::context::CompletionContext;
use crate::config::CompletionConfig;
use crate::grammar::{ContentSpec, DtdGrammar, Hint};

/// Where a candidate list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// The parent's content model
    ContentModel,
    /// Every declared element, because no usable content model exists
    Declared,
    /// Nothing may be inserted
    None,
}

/// Ordered candidates for one insertion point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub source: CandidateSource,
    /// The siblings already form complete content
    pub complete: bool,
    /// The siblings violate the content model
    pub invalid: bool,
    pub candidates: Vec<String>,
}

/// Main completion engine
pub struct CompletionEngine {
    grammar: Arc<DtdGrammar>,
    options: CompletionConfig,
}

impl CompletionEngine {
    /// Create a new completion engine
    pub fn new(grammar: Arc<DtdGrammar>, options: CompletionConfig) -> Self {
        Self { grammar, options }
    }

    /// Complete the tag name at the given insertion point
    pub fn complete(&self, context: &CompletionContext) -> Completion {
        // 1. Ask the content model
        let hint = self.grammar.hint(&context.parent, &context.siblings);

        // 2. Pick the source, with fallbacks
        let (source, names, complete, invalid) = match hint {
            Hint::Candidates { candidates } => {
                let complete = candidates.is_empty();
                (CandidateSource::ContentModel, candidates.unique_sorted(), complete, false)
            }
            Hint::Invalid if self.options.fallback_on_invalid => {
                (CandidateSource::Declared, self.declared(), false, true)
            }
            Hint::Invalid => (CandidateSource::None, Vec::new(), false, true),
            Hint::NoModel { spec: Some(spec) } if !spec.allows_children() => {
                let complete = matches!(spec, ContentSpec::Empty);
                (CandidateSource::None, Vec::new(), complete, false)
            }
            Hint::NoModel { .. } | Hint::Unparseable { .. } => {
                (CandidateSource::Declared, self.declared(), false, false)
            }
        };

        // 3. Filter by prefix, optionally dropping what is already typed
        let mut candidates: Vec<String> = names
            .into_iter()
            .filter(|name| context.matches(name, self.options.case_sensitive))
            .collect();
        if self.options.drop_exact_match && !context.prefix.is_empty() {
            candidates.retain(|name| name != &context.prefix);
        }

        // 4. Order
        sort_candidates(&mut candidates, &context.prefix);

        debug!(
            parent = %context.parent,
            source = ?source,
            count = candidates.len(),
            "completed element names"
        );

        Completion {
            source,
            complete,
            invalid,
            candidates,
        }
    }

    fn declared(&self) -> Vec<String> {
        self.grammar.declared_elements().into_iter().collect()
    }
}

/// Sort candidates: exact match first, then shorter names, then alphabetically
fn sort_candidates(candidates: &mut [String], prefix: &str) {
    candidates.sort_by(|a, b| {
        if !prefix.is_empty() {
            match (a == prefix, b == prefix) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
}
