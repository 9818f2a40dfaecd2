//! Per-element content-model cache
//!
//! Declarations are registered as raw text and parsed on first use. Each
//! element is parsed at most once: a successful parse is stored as a shared
//! automaton, a failed one as a sentinel carrying the error, so malformed
//! text is never reparsed.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use super::declaration::ContentSpec;
use crate::error::ModelError;
use crate::model::ContentModel;

/// Automaton shared between queries; each query locks, resets and steps it
pub type SharedModel = Arc<Mutex<ContentModel>>;

/// Parse state of one declared element
#[derive(Debug)]
enum ModelState {
    /// No grammar text to build from (`EMPTY`, `ANY`, `(#PCDATA)`)
    Absent,
    /// Registered but not parsed yet
    Raw,
    Parsed(SharedModel),
    Unparseable(ModelError),
}

#[derive(Debug)]
struct Entry {
    spec: ContentSpec,
    state: ModelState,
}

/// Result of looking up an element's automaton
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The element was never declared
    Undeclared,
    /// Declared without a content model
    NoModel(ContentSpec),
    /// The declared model text failed to parse
    Unparseable(ModelError),
    /// Ready to evaluate
    Model(SharedModel),
}

/// Thread-safe map from element name to its lazily parsed content model
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<String, Entry>>,
    parses: AtomicUsize,
}

impl ModelCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the content specification of `element`
    ///
    /// A later declaration of the same element replaces the earlier one and
    /// discards its parsed model. Returns the replaced specification.
    pub fn declare(&self, element: impl Into<String>, spec: ContentSpec) -> Option<ContentSpec> {
        let element = element.into();
        let state = match spec.model_text() {
            Some(_) => ModelState::Raw,
            None => ModelState::Absent,
        };
        debug!(element = %element, spec = ?spec, "declared element");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .insert(element, Entry { spec, state })
            .map(|previous| previous.spec)
    }

    /// Look up the automaton for `element`, parsing it on first use
    pub fn lookup(&self, element: &str) -> Lookup {
        // Fast path: already resolved
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(element) {
                None => return Lookup::Undeclared,
                Some(entry) => {
                    if let Some(resolved) = Self::resolved(entry) {
                        return resolved;
                    }
                }
            }
        }

        // Raw: parse under the write lock; another thread may have won the race
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = entries.get_mut(element) else {
            return Lookup::Undeclared;
        };
        if let Some(resolved) = Self::resolved(entry) {
            return resolved;
        }

        let text = entry.spec.model_text().unwrap_or_default();
        self.parses.fetch_add(1, Ordering::Relaxed);
        entry.state = match ContentModel::parse(text) {
            Ok(model) => {
                debug!(element, model = %model, "parsed content model");
                ModelState::Parsed(Arc::new(Mutex::new(model)))
            }
            Err(err) => {
                warn!(element, error = %err, "content model is unparseable");
                ModelState::Unparseable(err)
            }
        };

        Self::resolved(entry).unwrap_or(Lookup::Undeclared)
    }

    /// Content specification declared for `element`
    pub fn spec(&self, element: &str) -> Option<ContentSpec> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(element).map(|entry| entry.spec.clone())
    }

    /// Names of all declared elements, sorted
    pub fn elements(&self) -> BTreeSet<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.keys().cloned().collect()
    }

    /// Number of declared elements
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of parse attempts made so far
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    /// Drop every declaration, e.g. when the DTD is reloaded
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        debug!("cleared content model cache");
    }

    fn resolved(entry: &Entry) -> Option<Lookup> {
        match &entry.state {
            ModelState::Raw => None,
            ModelState::Absent => Some(Lookup::NoModel(entry.spec.clone())),
            ModelState::Parsed(model) => Some(Lookup::Model(Arc::clone(model))),
            ModelState::Unparseable(err) => Some(Lookup::Unparseable(err.clone())),
        }
    }
}
