//! dtdhint library
//!
//! Parses DTD element content models into automatons and answers which
//! child element names may legally come next after a list of siblings.
//!
//! # Modules
//!
//! - `model`: content-model parser and automaton
//! - `grammar`: per-DTD declarations with a shared, lazily parsed model cache
//! - `completion`: candidate lists with fallbacks, prefix filtering and ordering
//! - `config`: configuration management
//! - `formatter`: text and JSON output
//! - `cli`: command-line interface
//! - `error`: error types and handling
//!
//! # Example
//!
//! ```
//! use dtdhint::DtdGrammar;
//!
//! let grammar = DtdGrammar::new();
//! grammar.declare("book", "(title,(author|editor)+,chapter*)");
//!
//! let next = grammar.what_can_follow("book", ["title", "author"]).unwrap();
//! assert_eq!(next.iter().collect::<Vec<_>>(), vec!["chapter"]);
//!
//! // The siblings already break the model: no grammar-based hint
//! assert!(grammar.what_can_follow("book", ["chapter"]).is_none());
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod grammar;
pub mod model;

// Re-export commonly used types
pub use completion::{CompletionContext, CompletionEngine};
pub use config::Config;
pub use error::{HintError, Result};
pub use grammar::{Candidates, DtdGrammar, Hint};
pub use model::{ContentModel, Evaluation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
