//! DTD content-model automaton
//!
//! This module turns the text of a DTD element content model, such as
//! `(title,(author|editor)+,chapter*)`, into an automaton that answers
//! "which element names may legally come next?" for a partial list of
//! children.
//!
//! # Architecture
//!
//! - **Food**: lazy, backtrackable cursor over the sibling names fed in
//! - **Lexer**: delimiter-preserving tokenizer with one token of pushback
//! - **Parser**: recursive descent from grammar text to a [`Node`] tree
//! - **Node**: element / sequence / choice / repeat automaton variants
//! - **ContentModel**: root wrapper enforcing the reset, step, query order
//!
//! # Examples
//!
//! ```
//! use dtdhint::model::{ContentModel, Evaluation};
//!
//! let mut model = ContentModel::parse("(a,b?,c)").unwrap();
//! assert_eq!(
//!     model.evaluate(["a"]),
//!     Evaluation::Expecting(vec!["b".to_string(), "c".to_string()])
//! );
//! ```

mod food;
mod lexer;
mod node;
mod parser;


use std::fmt;

pub use food::{Food, Mark};
pub use lexer::{Lexer, Multiplicity, Token, TokenKind};
pub use node::{Names, Node};
pub use parser::parse;

use crate::error::ModelError;

/// Outcome of feeding a sibling sequence to a content model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The siblings already violate the model
    Invalid,
    /// The siblings form a complete match; nothing more is required
    Satisfied,
    /// Names that may legally come next (unsorted, duplicates possible)
    Expecting(Vec<String>),
}

/// Parsed content model with its evaluation state
///
/// The evaluation protocol is strictly sequential: [`reset`](Self::reset),
/// then one [`step`](Self::step), then any number of queries. Calling `step`
/// a second time without a reset is reported as
/// [`ModelError::UnexpectedQueryState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentModel {
    root: Node,
    fed: bool,
}

impl ContentModel {
    /// Wrap an already built node tree
    pub fn new(root: Node) -> Self {
        Self { root, fed: false }
    }

    /// Parse grammar text into a content model
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        parse(text).map(Self::new)
    }

    /// Root node of the automaton
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Restore the initial, unmatched state
    pub fn reset(&mut self) {
        self.root.reset();
        self.fed = false;
    }

    /// Feed sibling names to the automaton
    ///
    /// Returns `Ok(false)` when the next name is a structural mismatch.
    pub fn step<I>(&mut self, food: &mut Food<I>) -> Result<bool, ModelError>
    where
        I: Iterator,
        I::Item: AsRef<str>,
    {
        if self.fed {
            return Err(ModelError::UnexpectedQueryState(
                "step called twice without reset".to_string(),
            ));
        }
        self.fed = true;
        Ok(self.root.step(food))
    }

    /// Whether the names fed so far form a complete match
    pub fn terminated(&self) -> bool {
        self.root.terminated()
    }

    /// Whether the current state needs no further names
    pub fn is_optional(&self) -> bool {
        self.root.is_optional()
    }

    /// Names that may legally come next
    pub fn possibilities(&mut self) -> Result<Names<'_>, ModelError> {
        if !self.fed {
            return Err(ModelError::UnexpectedQueryState(
                "possibilities requested before any step".to_string(),
            ));
        }
        Ok(self.root.possibilities())
    }

    /// Reset, feed `siblings` and report what may follow
    ///
    /// Only a structural mismatch is invalid. Siblings the automaton did not
    /// eat are left alone: a terminated model answers with no names, any
    /// other state with its possibilities.
    pub fn evaluate<T, S>(&mut self, siblings: T) -> Evaluation
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reset();
        let mut food = Food::new(siblings);
        self.fed = true;

        if !self.root.step(&mut food) {
            return Evaluation::Invalid;
        }
        if self.root.terminated() {
            return Evaluation::Satisfied;
        }
        Evaluation::Expecting(self.root.possibilities().map(str::to_owned).collect())
    }

    /// Names that may follow `siblings`, `None` when they violate the model
    pub fn what_can_follow<T, S>(&mut self, siblings: T) -> Option<Vec<String>>
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.evaluate(siblings) {
            Evaluation::Invalid => None,
            Evaluation::Satisfied => Some(Vec::new()),
            Evaluation::Expecting(names) => Some(names),
        }
    }

    /// Element names appearing in the model, in grammar order
    pub fn element_names(&self) -> Names<'_> {
        self.root.element_names()
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = match &self.root {
            Node::Repeat { peer, .. } => peer.is_group(),
            other => other.is_group(),
        };
        if grouped {
            write!(f, "{}", self.root)
        } else {
            write!(f, "({})", self.root)
        }
    }
}
