//! Plain text output: one name per line, notes for empty answers

use nu_ansi_term::{Color, Style};

use super::{CheckReport, EvalReport, EvalState};
use crate::completion::{CandidateSource, Completion};

/// Line-oriented text formatter
pub struct TextFormatter {
    /// Style for element names
    name: Style,
    /// Style for notes about empty answers
    note: Style,
    /// Style for a rejected sibling sequence
    error: Style,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                name: Style::new().fg(Color::Green),
                note: Style::new().italic().fg(Color::DarkGray),
                error: Style::new().fg(Color::Red),
            }
        } else {
            Self {
                name: Style::new(),
                note: Style::new(),
                error: Style::new(),
            }
        }
    }

    pub fn completion(&self, completion: &Completion) -> String {
        if !completion.candidates.is_empty() {
            return self.names(&completion.candidates);
        }
        if completion.invalid {
            self.error.paint("# siblings violate the content model").to_string()
        } else if completion.complete {
            self.note.paint("# content is complete").to_string()
        } else if completion.source == CandidateSource::None {
            self.note.paint("# no child elements allowed").to_string()
        } else {
            self.note.paint("# no candidates").to_string()
        }
    }

    pub fn evaluation(&self, report: &EvalReport) -> String {
        match report.state {
            EvalState::Invalid => self.error.paint("invalid").to_string(),
            EvalState::Satisfied => self.note.paint("satisfied").to_string(),
            EvalState::Expecting if report.candidates.is_empty() => {
                self.note.paint("# no candidates").to_string()
            }
            EvalState::Expecting => self.names(&report.candidates),
        }
    }

    pub fn check(&self, report: &CheckReport) -> String {
        let mut lines = vec![report.model.clone()];
        lines.extend(
            report
                .elements
                .iter()
                .map(|name| format!("  {}", self.name.paint(name))),
        );
        lines.join("\n")
    }

    fn names(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| self.name.paint(name).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
