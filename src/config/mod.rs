//! Configuration management for dtdhint
//!
//! Configuration is read from a TOML file (by default
//! `~/.dtdhint/config.toml`). Every field has a default, so a missing file or
//! a partial one is fine. Command-line flags override the loaded values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item};

use crate::error::{ConfigError, HintError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion behaviour
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How candidates are derived and filtered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Suggest every declared element when the siblings violate the model
    #[serde(default)]
    pub fallback_on_invalid: bool,

    /// Match the typed prefix case-sensitively
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Drop the candidate that equals the typed prefix
    #[serde(default)]
    pub drop_exact_match: bool,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (text, json, json-pretty)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One candidate per line
    Text,

    /// Compact JSON (single line)
    Json,

    /// Pretty-printed JSON
    JsonPretty,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Append logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default)]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

type SectionComments = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

/// Comments written by [`Config::to_toml_with_comments`]
const FIELD_COMMENTS: &[SectionComments] = &[
    (
        "completion",
        "How candidates are derived and filtered",
        &[
            (
                "fallback_on_invalid",
                "Suggest every declared element when the siblings violate the model",
            ),
            ("case_sensitive", "Match the typed prefix case-sensitively"),
            ("drop_exact_match", "Drop the candidate that equals the typed prefix"),
        ],
    ),
    (
        "display",
        "Output settings",
        &[
            ("format", "text, json or json-pretty"),
            ("color_output", "Enable colored output"),
        ],
    ),
    (
        "logging",
        "Diagnostics",
        &[
            ("level", "error, warn, info, debug or trace"),
            ("file", "Append logs to this file instead of stderr"),
            ("timestamps", "Enable timestamps in logs"),
        ],
    ),
];

// Default value functions
fn default_case_sensitive() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_color_output() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            fallback_on_invalid: false,
            case_sensitive: default_case_sensitive(),
            drop_exact_match: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: default_color_output(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            timestamps: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load configuration from an existing TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            HintError::Config(ConfigError::FileNotFound(format!("{}: {e}", path.display())))
        })?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dtdhint")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_with_comments()?)?;
        Ok(())
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize to TOML text with a comment above every section and field
    pub fn to_toml_with_comments(&self) -> Result<String> {
        let mut doc: DocumentMut = self
            .to_toml()?
            .parse()
            .map_err(|e: toml_edit::TomlError| ConfigError::InvalidFormat(e.to_string()))?;

        for (section, comment, fields) in FIELD_COMMENTS {
            let Some(table) = doc.get_mut(section).and_then(Item::as_table_mut) else {
                continue;
            };
            table.decor_mut().set_prefix(format!("\n# {comment}\n"));
            for (field, comment) in *fields {
                if let Some(mut key) = table.key_mut(field) {
                    key.leaf_decor_mut().set_prefix(format!("# {comment}\n"));
                }
            }
        }

        Ok(doc.to_string().trim_start().to_string())
    }

    /// Validate the configuration
    ///
    /// A log file must live in an existing directory.
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.logging.file {
            let dir = match file.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            if file.file_name().is_none() || !dir.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.file".to_string(),
                    value: file.display().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}
