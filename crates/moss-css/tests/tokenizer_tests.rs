//! Integration tests for the CSS lexer.

use moss_css::{Lexer, Messages, TokenKind};

/// Lex the whole input, returning the token kinds up to EOF.
fn tokenize(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(input, "test.css", Messages::new());
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next();
        let done = token.is_eof();
        kinds.push(token.kind);
        if done {
            break;
        }
    }
    kinds
}

fn tokenize_with_messages(input: &str) -> (Vec<TokenKind>, Messages) {
    let messages = Messages::new();
    let mut lexer = Lexer::new(input, "test.css", messages.clone());
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next();
        let done = token.is_eof();
        kinds.push(token.kind);
        if done {
            break;
        }
    }
    (kinds, messages)
}

#[test]
fn test_whitespace_is_a_token() {
    let kinds = tokenize("  \t\n ");
    assert_eq!(kinds, vec![TokenKind::Space, TokenKind::Eof]);
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokenize("background-color"),
        vec![TokenKind::Ident("background-color".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        tokenize("_private"),
        vec![TokenKind::Ident("_private".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        tokenize("-moz-thing"),
        vec![TokenKind::Ident("-moz-thing".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_function_head() {
    assert_eq!(
        tokenize("rgb("),
        vec![TokenKind::FunctionHead("rgb".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_at_keyword() {
    assert_eq!(
        tokenize("@media"),
        vec![TokenKind::AtKeyword("media".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_hash() {
    assert_eq!(
        tokenize("#header"),
        vec![TokenKind::Hash("header".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        tokenize("#ff0000"),
        vec![TokenKind::Hash("ff0000".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_strings() {
    assert_eq!(
        tokenize("\"hello world\""),
        vec![TokenKind::QuotedString("hello world".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        tokenize("'hello'"),
        vec![TokenKind::QuotedString("hello".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokenize(r#""a\"b""#),
        vec![TokenKind::QuotedString("a\"b".to_string()), TokenKind::Eof]
    );
    // Hex escape with its terminating space.
    assert_eq!(
        tokenize("\"\\41 b\""),
        vec![TokenKind::QuotedString("Ab".to_string()), TokenKind::Eof]
    );
    // Backslash-newline is a line continuation inside strings.
    assert_eq!(
        tokenize("\"a\\\nb\""),
        vec![TokenKind::QuotedString("ab".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_unterminated_string_keeps_content() {
    let (kinds, messages) = tokenize_with_messages("'abc");
    assert_eq!(
        kinds,
        vec![TokenKind::QuotedString("abc".to_string()), TokenKind::Eof]
    );
    assert!(messages.has_errors());
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokenize("42"),
        vec![
            TokenKind::Number {
                value: 42.0,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
    assert_eq!(
        tokenize("-10"),
        vec![
            TokenKind::Number {
                value: -10.0,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
    assert_eq!(
        tokenize(".5"),
        vec![
            TokenKind::Number {
                value: 0.5,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_dimension_and_percentage() {
    assert_eq!(
        tokenize("16px"),
        vec![
            TokenKind::Number {
                value: 16.0,
                suffix: Some("px".to_string())
            },
            TokenKind::Eof
        ]
    );
    assert_eq!(
        tokenize("50%"),
        vec![TokenKind::Percentage(50.0), TokenKind::Eof]
    );
}

#[test]
fn test_lone_dot_is_punctuation() {
    assert_eq!(
        tokenize(".foo"),
        vec![
            TokenKind::Dot,
            TokenKind::Ident("foo".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_url_tokens() {
    assert_eq!(
        tokenize("url(image.png)"),
        vec![TokenKind::Url("image.png".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        tokenize("url( 'img/a b.png' )"),
        vec![TokenKind::Url("img/a b.png".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_cdo_cdc() {
    assert_eq!(
        tokenize("<!-- -->"),
        vec![TokenKind::Cdo, TokenKind::Space, TokenKind::Cdc, TokenKind::Eof]
    );
}

#[test]
fn test_comments_are_discarded() {
    assert_eq!(
        tokenize("/* note */color"),
        vec![TokenKind::Ident("color".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_unterminated_comment_yields_slash() {
    let (kinds, messages) = tokenize_with_messages("/*x");
    assert!(messages.has_errors());
    // The '/' comes back as a slash; the rest re-lexes normally.
    assert_eq!(
        kinds,
        vec![
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Ident("x".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_important_is_composite() {
    assert_eq!(tokenize("!important"), vec![TokenKind::Important, TokenKind::Eof]);
    assert_eq!(
        tokenize("!  IMPORTANT"),
        vec![TokenKind::Important, TokenKind::Eof]
    );
    assert_eq!(
        tokenize("!x"),
        vec![
            TokenKind::Delim('!'),
            TokenKind::Ident("x".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_escaped_identifier() {
    assert_eq!(
        tokenize("\\41 "),
        vec![TokenKind::Ident("A".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_overflowing_escape_is_replaced() {
    // > 0xFFFF collapses to U+FFFD.
    assert_eq!(
        tokenize("\\10FFFF x"),
        vec![
            TokenKind::Ident("\u{FFFD}x".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        tokenize("{}[]();:,>+~*=|^$"),
        vec![
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Greater,
            TokenKind::Plus,
            TokenKind::Tilde,
            TokenKind::Asterisk,
            TokenKind::Equal,
            TokenKind::Pipe,
            TokenKind::Caret,
            TokenKind::Dollar,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_unget_and_peek() {
    let mut lexer = Lexer::new("a b", "test.css", Messages::new());
    let first = lexer.peek();
    assert_eq!(first.kind, TokenKind::Ident("a".to_string()));
    // Peek does not consume.
    let again = lexer.next();
    assert_eq!(again.kind, TokenKind::Ident("a".to_string()));
    lexer.unget(again);
    assert_eq!(lexer.next().kind, TokenKind::Ident("a".to_string()));
}

#[test]
fn test_rewind() {
    let mut lexer = Lexer::new("a b c", "test.css", Messages::new());
    let start = lexer.position();
    let _ = lexer.next_non_space();
    let _ = lexer.next_non_space();
    lexer.rewind(start);
    assert_eq!(lexer.next().kind, TokenKind::Ident("a".to_string()));
}

#[test]
fn test_locations_track_lines_and_columns() {
    let mut lexer = Lexer::new("a\n  b\r\nc", "sheet.css", Messages::new());
    let a = lexer.next();
    assert_eq!((a.location.line, a.location.column), (1, 1));
    let _space = lexer.next();
    let b = lexer.next();
    assert_eq!((b.location.line, b.location.column), (2, 3));
    let _space = lexer.next();
    // CRLF counts as a single line break.
    let c = lexer.next();
    assert_eq!((c.location.line, c.location.column), (3, 1));
    assert_eq!(&*c.location.filename, "sheet.css");
}

#[test]
fn test_any_input_terminates() {
    // Junk never hangs or panics; it lexes to delims and errors.
    let inputs = ["@", "#", "\\", "}{)(", "url(", "'", "/*", "!"];
    for input in inputs {
        let (kinds, _) = tokenize_with_messages(input);
        assert!(matches!(kinds.last(), Some(TokenKind::Eof)));
    }
}
