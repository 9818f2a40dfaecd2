//! Output formatting for dtdhint results
//!
//! Every command produces a serializable report; the formatter renders it as
//! text (one name per line) or JSON, colored when enabled.

mod json;
mod text;

use serde::Serialize;

use crate::completion::Completion;
use crate::config::{DisplayConfig, OutputFormat};
use crate::error::Result;
use crate::model::{ContentModel, Evaluation};

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// State reached after feeding siblings to a raw content model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalState {
    Invalid,
    Satisfied,
    Expecting,
}

/// Result of the `eval` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalReport {
    /// Normalized model text
    pub model: String,
    pub state: EvalState,
    /// Names that may come next, in grammar order
    pub candidates: Vec<String>,
}

impl EvalReport {
    pub fn new(model: &ContentModel, evaluation: Evaluation) -> Self {
        let (state, candidates) = match evaluation {
            Evaluation::Invalid => (EvalState::Invalid, Vec::new()),
            Evaluation::Satisfied => (EvalState::Satisfied, Vec::new()),
            Evaluation::Expecting(names) => (EvalState::Expecting, names),
        };
        Self {
            model: model.to_string(),
            state,
            candidates,
        }
    }
}

/// Result of the `check` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Normalized model text
    pub model: String,
    /// Element names in grammar order
    pub elements: Vec<String>,
}

impl CheckReport {
    pub fn new(model: &ContentModel) -> Self {
        Self {
            model: model.to_string(),
            elements: model.element_names().map(str::to_owned).collect(),
        }
    }
}

/// Main formatter for command results
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    pub fn format_completion(&self, completion: &Completion) -> Result<String> {
        if self.format_type.is_json() {
            self.json().format(completion)
        } else {
            Ok(self.text().completion(completion))
        }
    }

    pub fn format_evaluation(&self, report: &EvalReport) -> Result<String> {
        if self.format_type.is_json() {
            self.json().format(report)
        } else {
            Ok(self.text().evaluation(report))
        }
    }

    pub fn format_check(&self, report: &CheckReport) -> Result<String> {
        if self.format_type.is_json() {
            self.json().format(report)
        } else {
            Ok(self.text().check(report))
        }
    }

    fn text(&self) -> TextFormatter {
        TextFormatter::new(self.use_colors)
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(self.format_type == OutputFormat::JsonPretty, self.use_colors)
    }
}
