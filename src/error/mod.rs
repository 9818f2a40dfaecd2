//! Error handling for content-model parsing and hint queries.
//!
//! This module provides:
//! - Content-model errors (malformed grammar text, protocol misuse)
//! - Configuration errors
//! - A single top-level error type with conversions from the specific kinds
//!
//! # Example
//!
//! ```rust
//! use dtdhint::error::{HintError, ModelError};
//! use dtdhint::model::ContentModel;
//!
//! let err = ContentModel::parse("a,b)").unwrap_err();
//! assert!(matches!(
//!     HintError::from(err),
//!     HintError::Model(ModelError::MalformedContentModel { .. })
//! ));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, HintError, ModelError, Result};
