//! Recursive-descent parser for DTD content models
//!
//! Grammar accepted:
//!
//! ```text
//! model   := '(' group
//! group   := item ((',' | '|') item)* ')' suffix?
//! item    := name suffix? | '(' group
//! suffix  := '?' | '*' | '+'
//! ```
//!
//! A `#PCDATA` marker inside a group contributes no node; everything up to
//! and including the following `|` is skipped.

use tracing::trace;

use super::lexer::{Lexer, Token, TokenKind};
use super::node::Node;
use crate::error::ModelError;

/// Connector used between the items of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connector {
    Sequence,
    Choice,
}

impl Connector {
    fn symbol(self) -> char {
        match self {
            Connector::Sequence => ',',
            Connector::Choice => '|',
        }
    }
}

/// Deepest group nesting accepted
const MAX_DEPTH: usize = 256;

/// Parse content-model text such as `(title,(author|editor)+,chapter*)`
pub fn parse(text: &str) -> Result<Node, ModelError> {
    let mut parser = ModelParser::new(text);
    let node = parser.model()?;
    trace!(model = text, parsed = %node, "parsed content model");
    Ok(node)
}

struct ModelParser<'a> {
    text: &'a str,
    lexer: Lexer<'a>,
    /// Groups currently open
    depth: usize,
}

impl<'a> ModelParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lexer: Lexer::new(text),
            depth: 0,
        }
    }

    fn model(&mut self) -> Result<Node, ModelError> {
        match self.lexer.next_significant() {
            Some(Token {
                kind: TokenKind::Open,
                ..
            }) => {}
            Some(token) => {
                return Err(self.error(format!(
                    "expected '(' at offset {}",
                    token.span.start
                )));
            }
            None => return Err(self.error("empty content model")),
        }

        let node = self.group()?;

        if let Some(token) = self.lexer.next_significant() {
            return Err(self.error(format!(
                "unexpected '{}' after the outermost group at offset {}",
                &self.text[token.span.clone()],
                token.span.start
            )));
        }

        Ok(node)
    }

    /// Parse the rest of a group whose `(` was already consumed
    fn group(&mut self) -> Result<Node, ModelError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(format!(
                "groups nested deeper than {MAX_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let node = self.group_items();
        self.depth -= 1;
        node
    }

    fn group_items(&mut self) -> Result<Node, ModelError> {
        let mut children = Vec::new();
        let mut connector: Option<Connector> = None;
        let mut after_item = false;

        loop {
            let Some(token) = self.lexer.next_significant() else {
                return Err(self.error("missing ')'"));
            };

            match token.kind {
                TokenKind::Close => {
                    if !after_item && !children.is_empty() {
                        return Err(self.error(format!(
                            "dangling connector before ')' at offset {}",
                            token.span.start
                        )));
                    }
                    break;
                }
                TokenKind::Name(name) if name.starts_with('#') => {
                    self.expect_connector(after_item, &token)?;
                    if self.skip_mixed_marker()? {
                        break;
                    }
                    after_item = false;
                }
                TokenKind::Open => {
                    self.expect_connector(after_item, &token)?;
                    let group = self.group()?;
                    children.push(group);
                    after_item = true;
                }
                TokenKind::Name(name) => {
                    self.expect_connector(after_item, &token)?;
                    let element = self.suffixed(Node::element(name));
                    children.push(element);
                    after_item = true;
                }
                TokenKind::Bar | TokenKind::Comma => {
                    let found = if token.kind == TokenKind::Bar {
                        Connector::Choice
                    } else {
                        Connector::Sequence
                    };
                    if !after_item {
                        return Err(self.error(format!(
                            "'{}' without a preceding item at offset {}",
                            found.symbol(),
                            token.span.start
                        )));
                    }
                    match connector {
                        Some(seen) if seen != found => {
                            return Err(self.error(format!(
                                "'{}' and '{}' mixed in one group at offset {}",
                                seen.symbol(),
                                found.symbol(),
                                token.span.start
                            )));
                        }
                        _ => connector = Some(found),
                    }
                    after_item = false;
                }
                TokenKind::Suffix(multiplicity) => {
                    return Err(self.error(format!(
                        "unexpected '{}' at offset {}",
                        multiplicity.symbol(),
                        token.span.start
                    )));
                }
                TokenKind::Whitespace => continue,
            }
        }

        let node = match connector {
            Some(Connector::Choice) => Node::choice(children),
            Some(Connector::Sequence) => Node::sequence(children),
            // A lone item, element or nested group, stands for the group itself
            None if children.len() == 1 => children.remove(0),
            None if children.is_empty() => {
                return Err(self.error("group declares no element"));
            }
            None => return Err(self.error("missing ',' or '|' between items")),
        };

        Ok(self.suffixed(node))
    }

    /// Skip a `#PCDATA` marker up to and including the next `|`.
    /// Returns `true` when the group closed instead.
    fn skip_mixed_marker(&mut self) -> Result<bool, ModelError> {
        loop {
            let Some(token) = self.lexer.next_significant() else {
                return Err(self.error("missing ')'"));
            };
            match token.kind {
                TokenKind::Bar => return Ok(false),
                TokenKind::Close => return Ok(true),
                _ => {}
            }
        }
    }

    /// Wrap `node` in a repeat when a multiplicity suffix follows
    fn suffixed(&mut self, node: Node) -> Node {
        match self.lexer.next_significant() {
            Some(Token {
                kind: TokenKind::Suffix(multiplicity),
                ..
            }) => Node::repeat(node, multiplicity),
            Some(token) => {
                self.lexer.push_back(token);
                node
            }
            None => node,
        }
    }

    fn expect_connector(&self, after_item: bool, token: &Token<'_>) -> Result<(), ModelError> {
        if after_item {
            return Err(self.error(format!(
                "missing ',' or '|' before offset {}",
                token.span.start
            )));
        }
        Ok(())
    }

    fn error(&self, reason: impl Into<String>) -> ModelError {
        ModelError::malformed(self.text, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(text: &str) -> String {
        parse(text).unwrap().to_string()
    }

    fn reason(text: &str) -> String {
        match parse(text).unwrap_err() {
            ModelError::MalformedContentModel { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(normalized("(a,b,c)"), "(a,b,c)");
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(normalized("(a|b)"), "(a|b)");
    }

    #[test]
    fn test_parse_nested_with_suffixes() {
        assert_eq!(
            normalized("(title,(author|editor)+,chapter*)"),
            "(title,(author|editor)+,chapter*)"
        );
    }

    #[test]
    fn test_parse_whitespace_everywhere() {
        assert_eq!(
            normalized("( title ,\n\t( author | editor ) + , chapter * )"),
            "(title,(author|editor)+,chapter*)"
        );
    }

    #[test]
    fn test_single_element_group() {
        let node = parse("(a)").unwrap();
        assert_eq!(node, Node::element("a"));
    }

    #[test]
    fn test_single_repeated_element() {
        assert_eq!(normalized("(a+)"), "a+");
    }

    #[test]
    fn test_group_level_suffix() {
        assert_eq!(normalized("(a,b)*"), "(a,b)*");
        assert_eq!(normalized("(a,b) ?"), "(a,b)?");
    }

    #[test]
    fn test_lone_nested_group_is_returned_verbatim() {
        assert_eq!(normalized("((a|b)*)"), "(a|b)*");
        assert_eq!(normalized("((a,b))"), "(a,b)");
    }

    #[test]
    fn test_mixed_content() {
        assert_eq!(normalized("(#PCDATA|em|strong)*"), "(em|strong)*");
        assert_eq!(normalized("(#PCDATA | em)*"), "em*");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(reason(""), "empty content model");
        assert_eq!(reason("  \n"), "empty content model");
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(normalized(&nested(MAX_DEPTH)), "a");

        assert_eq!(
            reason(&nested(MAX_DEPTH + 1)),
            format!("groups nested deeper than {MAX_DEPTH} levels")
        );
        assert_eq!(
            reason(&"(".repeat(200_000)),
            format!("groups nested deeper than {MAX_DEPTH} levels")
        );
    }

    #[test]
    fn test_missing_open_paren() {
        assert!(reason("a,b)").starts_with("expected '('"));
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(reason("(a,b"), "missing ')'");
        assert_eq!(reason("((a,b)"), "missing ')'");
    }

    #[test]
    fn test_trailing_tokens() {
        assert!(reason("(a,b))").contains("after the outermost group"));
        assert!(reason("(a) b").contains("after the outermost group"));
    }

    #[test]
    fn test_mixed_connectors() {
        assert!(reason("(a|b,c)").contains("mixed in one group"));
    }

    #[test]
    fn test_missing_connector() {
        assert!(reason("(a b)").starts_with("missing ',' or '|'"));
    }

    #[test]
    fn test_dangling_connectors() {
        assert!(reason("(a,)").starts_with("dangling connector"));
        assert!(reason("(,a)").contains("without a preceding item"));
        assert!(reason("(a,,b)").contains("without a preceding item"));
    }

    #[test]
    fn test_stray_suffix() {
        assert!(reason("(*a)").starts_with("unexpected '*'"));
        assert!(reason("(a**)").starts_with("unexpected '*'"));
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(reason("()"), "group declares no element");
        assert_eq!(reason("(#PCDATA)"), "group declares no element");
    }

    #[test]
    fn test_error_keeps_model_text() {
        match parse("(a,b").unwrap_err() {
            ModelError::MalformedContentModel { model, .. } => assert_eq!(model, "(a,b"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
