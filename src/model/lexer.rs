//! Tokenizer for content-model grammar text
//!
//! Splits the text on the delimiter set `| , * ? + ( )` and whitespace,
//! keeping every delimiter as a token of its own. Everything between
//! delimiters is a name token (`#PCDATA` included). A single pushback slot
//! lets the parser peek one token ahead.

use std::ops::Range;

/// Multiplicity suffix of an element or group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// `?` - zero or one
    Optional,
    /// `*` - zero or more
    ZeroOrMore,
    /// `+` - one or more
    OneOrMore,
}

impl Multiplicity {
    /// Lower and upper bound; `None` as upper bound means unbounded
    pub fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Multiplicity::Optional => (0, Some(1)),
            Multiplicity::ZeroOrMore => (0, None),
            Multiplicity::OneOrMore => (1, None),
        }
    }

    /// Suffix character used in grammar text
    pub fn symbol(self) -> char {
        match self {
            Multiplicity::Optional => '?',
            Multiplicity::ZeroOrMore => '*',
            Multiplicity::OneOrMore => '+',
        }
    }

    /// Recover the suffix from a pair of bounds
    pub fn from_bounds(min: usize, max: Option<usize>) -> Option<Self> {
        match (min, max) {
            (0, Some(1)) => Some(Multiplicity::Optional),
            (0, None) => Some(Multiplicity::ZeroOrMore),
            (1, None) => Some(Multiplicity::OneOrMore),
            _ => None,
        }
    }
}

/// Token types of the content-model grammar
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    /// `(`
    Open,
    /// `)`
    Close,
    /// `|`
    Bar,
    /// `,`
    Comma,
    /// `?`, `*` or `+`
    Suffix(Multiplicity),
    /// Run of spaces, tabs or line breaks
    Whitespace,
    /// Element name or `#PCDATA`
    Name(&'a str),
}

/// Token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    /// Create a new token
    pub fn new(kind: TokenKind<'a>, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Check if this token is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }
}

/// Delimiter-preserving tokenizer with one token of pushback
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    pushed: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over grammar text
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pushed: None,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(input: &'a str) -> Vec<Token<'a>> {
        let mut lexer = Self::new(input);
        std::iter::from_fn(|| lexer.next_token()).collect()
    }

    /// Get the next token, `None` at end of input
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pushed.take() {
            return Some(token);
        }

        let rest = &self.input[self.pos..];
        let ch = rest.chars().next()?;
        let start = self.pos;

        let kind = match ch {
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            '|' => TokenKind::Bar,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Suffix(Multiplicity::Optional),
            '*' => TokenKind::Suffix(Multiplicity::ZeroOrMore),
            '+' => TokenKind::Suffix(Multiplicity::OneOrMore),
            c if is_space(c) => {
                let len = rest.find(|c: char| !is_space(c)).unwrap_or(rest.len());
                self.pos += len;
                return Some(Token::new(TokenKind::Whitespace, start..self.pos));
            }
            _ => {
                let len = rest.find(is_delimiter).unwrap_or(rest.len());
                self.pos += len;
                return Some(Token::new(
                    TokenKind::Name(&self.input[start..self.pos]),
                    start..self.pos,
                ));
            }
        };

        self.pos += ch.len_utf8();
        Some(Token::new(kind, start..self.pos))
    }

    /// Get the next token that is not whitespace
    pub fn next_significant(&mut self) -> Option<Token<'a>> {
        loop {
            let token = self.next_token()?;
            if !token.is_whitespace() {
                return Some(token);
            }
        }
    }

    /// Return a token to the stream; the slot holds at most one token
    pub fn push_back(&mut self, token: Token<'a>) {
        debug_assert!(self.pushed.is_none(), "pushback slot already occupied");
        self.pushed = Some(token);
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_delimiter(c: char) -> bool {
    is_space(c) || matches!(c, '|' | ',' | '*' | '?' | '+' | '(' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_delimiters_are_tokens() {
        assert_eq!(
            kinds("(a|b)*"),
            vec![
                TokenKind::Open,
                TokenKind::Name("a"),
                TokenKind::Bar,
                TokenKind::Name("b"),
                TokenKind::Close,
                TokenKind::Suffix(Multiplicity::ZeroOrMore),
            ]
        );
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        assert_eq!(
            kinds("( a ,\n\t b )"),
            vec![
                TokenKind::Open,
                TokenKind::Whitespace,
                TokenKind::Name("a"),
                TokenKind::Whitespace,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Name("b"),
                TokenKind::Whitespace,
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn test_pcdata_and_qualified_names() {
        assert_eq!(
            kinds("(#PCDATA|xhtml:p)"),
            vec![
                TokenKind::Open,
                TokenKind::Name("#PCDATA"),
                TokenKind::Bar,
                TokenKind::Name("xhtml:p"),
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::tokenize("(title,p+)");
        assert_eq!(tokens[1].span, 1..6);
        assert_eq!(tokens[4].span, 8..9);
    }

    #[test]
    fn test_push_back() {
        let mut lexer = Lexer::new("a b");
        let first = lexer.next_significant().unwrap();
        assert_eq!(first.kind, TokenKind::Name("a"));
        let second = lexer.next_significant().unwrap();
        lexer.push_back(second.clone());
        assert_eq!(lexer.next_token(), Some(second));
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn test_multiplicity_bounds() {
        assert_eq!(Multiplicity::Optional.bounds(), (0, Some(1)));
        assert_eq!(Multiplicity::ZeroOrMore.bounds(), (0, None));
        assert_eq!(Multiplicity::OneOrMore.bounds(), (1, None));
        assert_eq!(
            Multiplicity::from_bounds(1, None),
            Some(Multiplicity::OneOrMore)
        );
        assert_eq!(Multiplicity::from_bounds(2, Some(3)), None);
    }
}
