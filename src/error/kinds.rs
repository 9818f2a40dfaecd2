use std::{fmt, io};

/// Crate-wide `Result` type using [`HintError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, HintError>;

/// Top-level error type for dtdhint operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum HintError {
    /// Content-model errors.
    Model(ModelError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Content-model specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The grammar text does not describe a content model.
    MalformedContentModel {
        /// Offending grammar text
        model: String,
        /// What went wrong
        reason: String,
    },

    /// The automaton was driven out of protocol order.
    UnexpectedQueryState(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

impl ModelError {
    /// Create a malformed content model error
    pub fn malformed(model: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::MalformedContentModel {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintError::Model(e) => write!(f, "{e}"),
            HintError::Config(e) => write!(f, "Configuration error: {e}"),
            HintError::Io(e) => write!(f, "I/O error: {e}"),
            HintError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MalformedContentModel { model, reason } => {
                write!(f, "Malformed content model '{model}': {reason}")
            }
            ModelError::UnexpectedQueryState(msg) => {
                write!(f, "Unexpected query state: {msg}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for HintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HintError::Model(e) => Some(e),
            HintError::Config(e) => Some(e),
            HintError::Io(e) => Some(e),
            HintError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ModelError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to HintError ========================= */

impl From<io::Error> for HintError {
    fn from(err: io::Error) -> Self {
        HintError::Io(err)
    }
}

impl From<ModelError> for HintError {
    fn from(err: ModelError) -> Self {
        HintError::Model(err)
    }
}

impl From<ConfigError> for HintError {
    fn from(err: ConfigError) -> Self {
        HintError::Config(err)
    }
}

impl From<toml::de::Error> for HintError {
    fn from(err: toml::de::Error) -> Self {
        HintError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for HintError {
    fn from(err: toml::ser::Error) -> Self {
        HintError::Config(ConfigError::Generic(format!("Failed to serialize config: {err}")))
    }
}

impl From<serde_json::Error> for HintError {
    fn from(err: serde_json::Error) -> Self {
        HintError::Generic(format!("JSON error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = ModelError::malformed("(a,b", "missing ')'");
        assert_eq!(
            err.to_string(),
            "Malformed content model '(a,b': missing ')'"
        );
    }

    #[test]
    fn test_conversion_into_hint_error() {
        let err: HintError = ModelError::UnexpectedQueryState("stepped twice".into()).into();
        assert!(matches!(
            err,
            HintError::Model(ModelError::UnexpectedQueryState(_))
        ));
        assert_eq!(err.to_string(), "Unexpected query state: stepped twice");
    }

    #[test]
    fn test_config_error_display() {
        let err: HintError = ConfigError::InvalidValue {
            field: "display.format".into(),
            value: "xml".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value 'xml' for field 'display.format'"
        );
    }
}
