//! Element-name completion on top of the grammar facade
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use dtdhint::completion::{CompletionContext, CompletionEngine};
//! use dtdhint::config::CompletionConfig;
//! use dtdhint::grammar::DtdGrammar;
//!
//! let grammar = DtdGrammar::new();
//! grammar.declare("list", "(head?,item+)");
//! let engine = CompletionEngine::new(Arc::new(grammar), CompletionConfig::default());
//!
//! let context = CompletionContext::new("list").with_prefix("i");
//! assert_eq!(engine.complete(&context).candidates, vec!["item"]);
//! ```

mod context;
mod engine;

pub use context::CompletionContext;
pub use engine::{CandidateSource, Completion, CompletionEngine};
