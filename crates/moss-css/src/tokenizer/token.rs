//! CSS token types.
//!
//! Tokens follow CSS 2.1 ([Appendix G.2 Lexical scanner](https://www.w3.org/TR/CSS21/grammar.html#scanner))
//! with a handful of practical deviations: whitespace is a real token
//! (selector grammar treats it as the descendant combinator), a dimension
//! is a [`TokenKind::Number`] carrying its unit suffix, and `!important` is
//! lexed as one composite token.

use std::fmt;
use std::sync::Arc;

/// Where a token (or diagnostic) came from.
///
/// `line` and `column` are 1-based; `offset`/`length` are in characters
/// from the start of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Name of the stylesheet the text came from.
    pub filename: Arc<str>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Character offset from the start of the input.
    pub offset: usize,
    /// Length of the token in characters.
    pub length: usize,
}

impl SourceLocation {
    /// A location for text that has no real source (tests, synthesized
    /// rules).
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            filename: Arc::from(""),
            line: 1,
            column: 1,
            offset: 0,
            length: 0,
        }
    }
}

/// The lexical class of a [`Token`], with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A run of whitespace. Significant between simple selectors.
    Space,
    /// An identifier.
    Ident(String),
    /// An identifier immediately followed by `(`, e.g. `rgb(`.
    FunctionHead(String),
    /// `@` followed by an identifier.
    AtKeyword(String),
    /// `#` followed by a name (id selector or hex color).
    Hash(String),
    /// A quoted string, escapes resolved.
    QuotedString(String),
    /// `url(...)`, the argument with quotes stripped.
    Url(String),
    /// A number, optionally with a unit suffix (`12`, `12px`, `1.5em`).
    Number {
        /// The numeric value.
        value: f64,
        /// The unit identifier, if one immediately followed.
        suffix: Option<String>,
    },
    /// A number immediately followed by `%`.
    Percentage(f64),
    /// The composite `!important` token.
    Important,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// A `.` that does not start a number.
    Dot,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `>`
    Greater,
    /// `+` that does not start a number.
    Plus,
    /// `~`
    Tilde,
    /// `*`
    Asterisk,
    /// `=`
    Equal,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `$`
    Dollar,
    /// `/` (also produced by an unterminated comment).
    Slash,
    /// Any other single character.
    Delim(char),
    /// A character the lexer reported a diagnostic for.
    Error(char),
    /// End of input.
    Eof,
}

/// One lexed token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Lexical class and payload.
    pub kind: TokenKind,
    /// Source range the token was read from.
    pub location: SourceLocation,
}

impl Token {
    /// True for [`TokenKind::Space`].
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.kind, TokenKind::Space)
    }

    /// True for [`TokenKind::Eof`].
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// The identifier text, if this is an [`TokenKind::Ident`].
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// True if this is an identifier equal to `keyword`,
    /// ASCII-case-insensitively.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.ident().is_some_and(|n| n.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Space => write!(f, " "),
            TokenKind::Ident(v) => write!(f, "{v}"),
            TokenKind::FunctionHead(v) => write!(f, "{v}("),
            TokenKind::AtKeyword(v) => write!(f, "@{v}"),
            TokenKind::Hash(v) => write!(f, "#{v}"),
            TokenKind::QuotedString(v) => write!(f, "\"{v}\""),
            TokenKind::Url(v) => write!(f, "url({v})"),
            TokenKind::Number { value, suffix } => match suffix {
                Some(unit) => write!(f, "{value}{unit}"),
                None => write!(f, "{value}"),
            },
            TokenKind::Percentage(v) => write!(f, "{v}%"),
            TokenKind::Important => write!(f, "!important"),
            TokenKind::Cdo => write!(f, "<!--"),
            TokenKind::Cdc => write!(f, "-->"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Tilde => write!(f, "~"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Dollar => write!(f, "$"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Delim(c) | TokenKind::Error(c) => write!(f, "{c}"),
            TokenKind::Eof => Ok(()),
        }
    }
}
