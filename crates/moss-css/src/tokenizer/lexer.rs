//! Pull-based CSS lexer.
//!
//! [CSS 2.1 Appendix G.2](https://www.w3.org/TR/CSS21/grammar.html#scanner)
//!
//! The lexer produces one [`Token`] per call to [`Lexer::next`], supports a
//! single pending [`Lexer::unget`], and can save and restore its scan
//! position ([`Lexer::position`] / [`Lexer::rewind`]) — the grammar
//! combinators rely on the latter for transactional matching. Lexical
//! errors are reported to the shared [`Messages`] sink and never stop the
//! token stream.

use std::sync::Arc;

use crate::messages::Messages;

use super::token::{SourceLocation, Token, TokenKind};

/// Saved scan position for [`Lexer::rewind`].
///
/// Captures the character offset, the line number, and the offset of the
/// current line's start (the column anchor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexPos {
    offset: usize,
    line: u32,
    line_start: usize,
}

/// Pull lexer over a stylesheet's text.
pub struct Lexer {
    input: Vec<char>,
    offset: usize,
    line: u32,
    line_start: usize,
    filename: Arc<str>,
    messages: Messages,
    pending: Option<Token>,
    /// Offset of the newline character that last incremented `line`, used
    /// to collapse CR/LF, LF/CR pairs into one line break.
    counted_newline: Option<(usize, char)>,
}

impl Lexer {
    /// Create a lexer over `input`. `filename` labels source locations.
    pub fn new(input: &str, filename: &str, messages: Messages) -> Self {
        Self {
            input: input.chars().collect(),
            offset: 0,
            line: 1,
            line_start: 0,
            filename: Arc::from(filename),
            messages,
            pending: None,
            counted_newline: None,
        }
    }

    /// The diagnostics sink this lexer reports into.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// The filename used for source locations.
    #[must_use]
    pub fn filename(&self) -> &Arc<str> {
        &self.filename
    }

    /// Current scan position (before any pending ungot token).
    #[must_use]
    pub fn position(&self) -> LexPos {
        if let Some(token) = &self.pending {
            let loc = &token.location;
            LexPos {
                offset: loc.offset,
                line: loc.line,
                line_start: loc.offset + 1 - loc.column as usize,
            }
        } else {
            LexPos {
                offset: self.offset,
                line: self.line,
                line_start: self.line_start,
            }
        }
    }

    /// Restore a position previously returned by [`Lexer::position`].
    /// Clears any pending token.
    pub fn rewind(&mut self, pos: LexPos) {
        self.pending = None;
        self.offset = pos.offset;
        self.line = pos.line;
        self.line_start = pos.line_start;
        self.counted_newline = None;
    }

    /// Push one token back; it is returned by the next [`Lexer::next`].
    /// At most one token may be pending.
    pub fn unget(&mut self, token: Token) {
        debug_assert!(self.pending.is_none(), "only one token may be ungot");
        self.pending = Some(token);
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Token {
        if let Some(token) = &self.pending {
            return token.clone();
        }
        let token = self.next();
        self.unget(token.clone());
        token
    }

    /// Consume whitespace tokens, returning the first non-space token.
    pub fn next_non_space(&mut self) -> Token {
        loop {
            let token = self.next();
            if !token.is_space() {
                return token;
            }
        }
    }

    /// Consume pending whitespace so the next token is not [`TokenKind::Space`].
    pub fn skip_space(&mut self) {
        loop {
            let token = self.next();
            if !token.is_space() {
                self.unget(token);
                return;
            }
        }
    }

    /// Produce the next token.
    pub fn next(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }

        let start = self.mark();
        let Some(c) = self.consume() else {
            return self.token(start, TokenKind::Eof);
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                self.token(start, TokenKind::Space)
            }

            '/' => {
                if self.peek_char() == Some('*') {
                    self.consume_comment(start)
                } else {
                    self.token(start, TokenKind::Slash)
                }
            }

            '"' | '\'' => self.consume_string(start, c),

            '#' => {
                if self.peek_char().is_some_and(is_name_char) || self.at_escape() {
                    let name = self.consume_name();
                    self.token(start, TokenKind::Hash(name))
                } else {
                    self.token(start, TokenKind::Delim('#'))
                }
            }

            '<' => {
                if self.lookahead_is("!--") {
                    self.advance(3);
                    self.token(start, TokenKind::Cdo)
                } else {
                    self.token(start, TokenKind::Delim('<'))
                }
            }

            '@' => {
                if self.peek_char().is_some_and(is_name_start_char) || self.at_escape() {
                    let name = self.consume_name();
                    self.token(start, TokenKind::AtKeyword(name))
                } else {
                    self.token(start, TokenKind::Delim('@'))
                }
            }

            '!' => self.consume_bang(start),

            '-' => {
                if self.lookahead_is("->") {
                    self.advance(2);
                    self.token(start, TokenKind::Cdc)
                } else if self.starts_number() {
                    self.consume_number(start, c)
                } else if self.peek_char().is_some_and(is_name_start_char) || self.at_escape() {
                    self.reconsume();
                    self.consume_ident_like(start)
                } else {
                    self.token(start, TokenKind::Delim('-'))
                }
            }

            '+' => {
                if self.starts_number() {
                    self.consume_number(start, c)
                } else {
                    self.token(start, TokenKind::Plus)
                }
            }

            '.' => {
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.reconsume();
                    self.consume_number(start, '0')
                } else {
                    self.token(start, TokenKind::Dot)
                }
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_number(start, '0')
            }

            '\\' => {
                if self.peek_char().is_some() && self.peek_char() != Some('\n') && self.peek_char() != Some('\r') {
                    self.reconsume();
                    self.consume_ident_like(start)
                } else {
                    self.messages.error(
                        "stray backslash is not a valid escape",
                        Some(self.location_from(start)),
                    );
                    self.token(start, TokenKind::Error('\\'))
                }
            }

            c if is_name_start_char(c) => {
                self.reconsume();
                self.consume_ident_like(start)
            }

            ':' => self.token(start, TokenKind::Colon),
            ';' => self.token(start, TokenKind::Semicolon),
            ',' => self.token(start, TokenKind::Comma),
            '{' => self.token(start, TokenKind::LeftBrace),
            '}' => self.token(start, TokenKind::RightBrace),
            '[' => self.token(start, TokenKind::LeftBracket),
            ']' => self.token(start, TokenKind::RightBracket),
            '(' => self.token(start, TokenKind::LeftParen),
            ')' => self.token(start, TokenKind::RightParen),
            '>' => self.token(start, TokenKind::Greater),
            '~' => self.token(start, TokenKind::Tilde),
            '*' => self.token(start, TokenKind::Asterisk),
            '=' => self.token(start, TokenKind::Equal),
            '|' => self.token(start, TokenKind::Pipe),
            '^' => self.token(start, TokenKind::Caret),
            '$' => self.token(start, TokenKind::Dollar),

            c => self.token(start, TokenKind::Delim(c)),
        }
    }

    // ── token scanners ──────────────────────────────────────────────────

    /// Skip `/* ... */`. An unterminated comment records an error and the
    /// opening `/` is returned as [`TokenKind::Slash`].
    fn consume_comment(&mut self, start: Mark) -> Token {
        let _ = self.consume(); // *
        loop {
            match self.consume() {
                Some('*') if self.peek_char() == Some('/') => {
                    let _ = self.consume();
                    return self.next();
                }
                Some(_) => {}
                None => {
                    self.messages
                        .error("unterminated comment", Some(self.location_from(start)));
                    // Re-lex from just after the '/', so the parser can
                    // resynchronize on the remaining characters.
                    self.rewind(LexPos {
                        offset: start.offset + 1,
                        line: start.line,
                        line_start: start.line_start,
                    });
                    return self.token(start, TokenKind::Slash);
                }
            }
        }
    }

    /// `'...'` or `"..."`, with escapes and `\<newline>` continuation.
    fn consume_string(&mut self, start: Mark, quote: char) -> Token {
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => {
                    self.messages
                        .error("unterminated string", Some(self.location_from(start)));
                    return self.token(start, TokenKind::QuotedString(value));
                }
                Some('\n') | Some('\r') => {
                    // The newline is left for the next token (whitespace).
                    self.messages
                        .error("unterminated string", Some(self.location_from(start)));
                    return self.token(start, TokenKind::QuotedString(value));
                }
                Some(c) if c == quote => {
                    let _ = self.consume();
                    return self.token(start, TokenKind::QuotedString(value));
                }
                Some('\\') => {
                    let _ = self.consume();
                    match self.peek_char() {
                        // Line continuation: consumes the newline, adds
                        // nothing to the value.
                        Some('\n') | Some('\r') => self.consume_line_break(),
                        None => {}
                        Some(_) => value.push(self.consume_escaped()),
                    }
                }
                Some(_) => {
                    if let Some(c) = self.consume() {
                        value.push(c);
                    }
                }
            }
        }
    }

    /// A number with optional fraction, then `%` or a unit identifier.
    fn consume_number(&mut self, start: Mark, first: char) -> Token {
        let mut repr = String::new();
        if first == '-' || first == '+' {
            repr.push(first);
        }
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            repr.push(self.consume().unwrap_or('0'));
        }
        if self.peek_char() == Some('.')
            && self
                .peek_char_at(1)
                .is_some_and(|c| c.is_ascii_digit())
        {
            repr.push(self.consume().unwrap_or('.'));
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                repr.push(self.consume().unwrap_or('0'));
            }
        }
        let value: f64 = repr.parse().unwrap_or(0.0);

        if self.peek_char() == Some('%') {
            let _ = self.consume();
            return self.token(start, TokenKind::Percentage(value));
        }
        if self.peek_char().is_some_and(is_name_start_char) || self.at_escape() {
            let suffix = self.consume_name();
            return self.token(
                start,
                TokenKind::Number {
                    value,
                    suffix: Some(suffix),
                },
            );
        }
        self.token(start, TokenKind::Number {
            value,
            suffix: None,
        })
    }

    /// An identifier; `url(` becomes a URL token, any other `name(` a
    /// function head.
    fn consume_ident_like(&mut self, start: Mark) -> Token {
        let name = self.consume_name();
        if self.peek_char() == Some('(') {
            let _ = self.consume();
            if name.eq_ignore_ascii_case("url") {
                return self.consume_url(start);
            }
            return self.token(start, TokenKind::FunctionHead(name));
        }
        self.token(start, TokenKind::Ident(name))
    }

    /// The argument of `url(...)`: a quoted string or a bare run ending at
    /// whitespace, parentheses, or quotes. Consumed greedily.
    fn consume_url(&mut self, start: Mark) -> Token {
        while self.peek_char().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        let mut value = String::new();
        match self.peek_char() {
            Some(q @ ('"' | '\'')) => {
                let _ = self.consume();
                let inner = self.consume_string(self.mark(), q);
                if let TokenKind::QuotedString(s) = inner.kind {
                    value = s;
                }
            }
            _ => loop {
                match self.peek_char() {
                    None | Some(')') | Some('(') | Some('"') | Some('\'') => break,
                    Some(c) if is_whitespace(c) => break,
                    Some('\\') if self.at_escape() => {
                        let _ = self.consume();
                        value.push(self.consume_escaped());
                    }
                    Some(_) => {
                        if let Some(c) = self.consume() {
                            value.push(c);
                        }
                    }
                }
            },
        }
        while self.peek_char().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        match self.peek_char() {
            Some(')') => {
                let _ = self.consume();
            }
            _ => {
                self.messages
                    .error("unterminated url()", Some(self.location_from(start)));
                // Greedy recovery: skip to the closing parenthesis.
                while let Some(c) = self.consume() {
                    if c == ')' {
                        break;
                    }
                }
            }
        }
        self.token(start, TokenKind::Url(value))
    }

    /// `!` followed (whitespace-insensitively) by `important`, else a
    /// plain delimiter.
    fn consume_bang(&mut self, start: Mark) -> Token {
        let before = self.save();
        while self.peek_char().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        if self.peek_char().is_some_and(is_name_start_char) {
            let word = self.consume_name();
            if word.eq_ignore_ascii_case("important") {
                return self.token(start, TokenKind::Important);
            }
        }
        self.restore(before);
        self.token(start, TokenKind::Delim('!'))
    }

    /// An identifier: optional leading `-`, a start character, then name
    /// characters and escapes.
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        if self.peek_char() == Some('-') {
            name.push('-');
            let _ = self.consume();
        }
        loop {
            match self.peek_char() {
                Some(c) if is_name_char(c) => {
                    name.push(c);
                    let _ = self.consume();
                }
                Some('\\') if self.at_escape() => {
                    let _ = self.consume();
                    name.push(self.consume_escaped());
                }
                _ => return name,
            }
        }
    }

    /// A backslash escape, the backslash already consumed: 1-6 hex digits
    /// with an optional trailing whitespace character, or any single
    /// character taken literally. Hex values of zero, surrogates, and
    /// values above 0xFFFF become U+FFFD.
    fn consume_escaped(&mut self) -> char {
        let Some(c) = self.consume() else {
            return '\u{FFFD}';
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }
        let mut hex = c.to_string();
        for _ in 0..5 {
            match self.peek_char() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(h);
                    let _ = self.consume();
                }
                _ => break,
            }
        }
        match self.peek_char() {
            Some('\n') | Some('\r') => self.consume_line_break(),
            Some(c) if is_whitespace(c) => {
                let _ = self.consume();
            }
            _ => {}
        }
        let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
        if code_point == 0 || code_point > 0xFFFF || (0xD800..=0xDFFF).contains(&code_point) {
            return '\u{FFFD}';
        }
        char::from_u32(code_point).unwrap_or('\u{FFFD}')
    }

    fn consume_whitespace(&mut self) {
        while self.peek_char().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// Consume one line break, collapsing CR/LF and LF/CR pairs.
    fn consume_line_break(&mut self) {
        let Some(first) = self.consume() else { return };
        if let Some(second) = self.peek_char() {
            if (second == '\n' || second == '\r') && second != first {
                let _ = self.consume();
            }
        }
    }

    // ── character-level helpers ─────────────────────────────────────────

    fn consume(&mut self) -> Option<char> {
        let c = *self.input.get(self.offset)?;
        self.offset += 1;
        if c == '\n' || c == '\r' {
            let here = self.offset - 1;
            let pairs_with_counted = self
                .counted_newline
                .is_some_and(|(at, prev)| at + 1 == here && prev != c);
            if pairs_with_counted {
                self.counted_newline = None;
            } else {
                self.line += 1;
                self.counted_newline = Some((here, c));
            }
            self.line_start = self.offset;
        }
        Some(c)
    }

    fn reconsume(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
        }
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            let _ = self.consume();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.peek_char_at(0)
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.input.get(self.offset + n).copied()
    }

    fn lookahead_is(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_char_at(i) == Some(c))
    }

    /// True if the characters at the cursor form a valid escape
    /// (backslash not followed by a newline).
    fn at_escape(&self) -> bool {
        self.peek_char() == Some('\\')
            && !matches!(self.peek_char_at(1), Some('\n') | Some('\r') | None)
    }

    /// True if the cursor is at the start of a number's digits
    /// (digit, or `.` digit).
    fn starts_number(&self) -> bool {
        match self.peek_char() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            line_start: self.line_start,
        }
    }

    fn save(&self) -> LexPos {
        LexPos {
            offset: self.offset,
            line: self.line,
            line_start: self.line_start,
        }
    }

    fn restore(&mut self, pos: LexPos) {
        self.offset = pos.offset;
        self.line = pos.line;
        self.line_start = pos.line_start;
        self.counted_newline = None;
    }

    fn token(&self, start: Mark, kind: TokenKind) -> Token {
        Token {
            kind,
            location: self.location_from(start),
        }
    }

    fn location_from(&self, start: Mark) -> SourceLocation {
        SourceLocation {
            filename: Arc::clone(&self.filename),
            line: start.line,
            column: (start.offset - start.line_start + 1) as u32,
            offset: start.offset,
            length: self.offset.saturating_sub(start.offset),
        }
    }
}

/// Token start bookkeeping.
#[derive(Debug, Clone, Copy)]
struct Mark {
    offset: usize,
    line: u32,
    line_start: usize,
}

/// A newline, tab, form feed, or space.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// A letter, `_`, or a non-ASCII code point.
fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// A name-start character, a digit, or `-`.
fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == '-'
}
