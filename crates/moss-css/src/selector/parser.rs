//! Token-driven selector parser.
//!
//! Grammar:
//!
//! ```text
//! compound_selector
//!     : selector ("," selector)*
//!     ;
//! selector
//!     : simple_selector (combinator? simple_selector)*
//!     ;
//! simple_selector
//!     : (element_name | "*")? filter*
//!     ;
//! filter
//!     : "." class | "#" id
//!     | "[" attr_name (op attr_value ("i" | "s")?)? "]"
//!     | ":" pseudo_class
//!     ;
//! ```
//!
//! Whitespace between simple selectors is the descendant combinator unless
//! `>`, `+`, or `~` overrides it. Errors produce diagnostics and `None`;
//! the stylesheet parser recovers by skipping to the next rule.

use crate::tokenizer::{Lexer, Token, TokenKind};

use super::{
    AttrOp, CaseMode, Combinator, CompoundSelector, Selector, SelectorComponent, SelectorFilter,
    SimpleSelector,
};

/// Parse a comma-separated selector list from the token stream.
///
/// Returns `None` after reporting a diagnostic if any member fails to
/// parse. The caller decides how to resynchronize.
pub fn parse_compound_selector(lexer: &mut Lexer) -> Option<CompoundSelector> {
    let mut selectors = Vec::new();
    loop {
        selectors.push(parse_selector(lexer)?);
        lexer.skip_space();
        if matches!(lexer.peek().kind, TokenKind::Comma) {
            let _ = lexer.next();
        } else {
            break;
        }
    }
    Some(CompoundSelector { selectors })
}

fn parse_selector(lexer: &mut Lexer) -> Option<Selector> {
    lexer.skip_space();
    let first = parse_simple_selector(lexer)?;
    let mut components = vec![SelectorComponent {
        combinator: Combinator::None,
        simple: first,
    }];

    loop {
        let mut saw_space = false;
        let mut token = lexer.next();
        while token.is_space() {
            saw_space = true;
            token = lexer.next();
        }
        let combinator = match token.kind {
            TokenKind::Greater => Combinator::Child,
            TokenKind::Plus => Combinator::NextSibling,
            TokenKind::Tilde => Combinator::SubsequentSibling,
            _ if saw_space && starts_simple_selector(&token.kind) => {
                lexer.unget(token);
                Combinator::Descendant
            }
            _ => {
                lexer.unget(token);
                break;
            }
        };
        if combinator != Combinator::Descendant {
            lexer.skip_space();
        }
        let simple = parse_simple_selector(lexer)?;
        components.push(SelectorComponent { combinator, simple });
    }

    Some(Selector::new(components))
}

fn starts_simple_selector(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Asterisk
            | TokenKind::Hash(_)
            | TokenKind::Dot
            | TokenKind::LeftBracket
            | TokenKind::Colon
    )
}

fn parse_simple_selector(lexer: &mut Lexer) -> Option<SimpleSelector> {
    let mut simple = SimpleSelector::default();
    let mut saw_anything = false;

    let head = lexer.peek();
    match &head.kind {
        TokenKind::Ident(name) => {
            let _ = lexer.next();
            simple.element_name = name.to_ascii_lowercase();
            saw_anything = true;
        }
        TokenKind::Asterisk => {
            let _ = lexer.next();
            saw_anything = true;
        }
        _ => {}
    }

    loop {
        let token = lexer.peek();
        let filter = match token.kind {
            TokenKind::Hash(name) => {
                let _ = lexer.next();
                SelectorFilter::Id(name)
            }
            TokenKind::Dot => {
                let _ = lexer.next();
                let name_token = lexer.next();
                match name_token.kind {
                    TokenKind::Ident(name) => SelectorFilter::Class(name),
                    _ => {
                        lexer.messages().error(
                            "expected a class name after '.'",
                            Some(name_token.location),
                        );
                        return None;
                    }
                }
            }
            TokenKind::LeftBracket => {
                let _ = lexer.next();
                parse_attribute_filter(lexer)?
            }
            TokenKind::Colon => {
                let _ = lexer.next();
                parse_pseudo_filter(lexer)?
            }
            _ => break,
        };
        simple.filters.push(filter);
        saw_anything = true;
    }

    if !saw_anything {
        lexer
            .messages()
            .error("expected a selector", Some(head.location));
        return None;
    }
    Some(simple)
}

/// The inside of `[...]`, the opening bracket already consumed.
fn parse_attribute_filter(lexer: &mut Lexer) -> Option<SelectorFilter> {
    lexer.skip_space();
    let name_token = lexer.next();
    let name = match name_token.kind {
        TokenKind::Ident(name) => name.to_ascii_lowercase(),
        _ => {
            lexer.messages().error(
                "expected an attribute name in '[...]'",
                Some(name_token.location),
            );
            return None;
        }
    };

    lexer.skip_space();
    let op_token = lexer.next();
    let op = match op_token.kind {
        TokenKind::RightBracket => return Some(SelectorFilter::HasAttribute(name)),
        TokenKind::Equal => AttrOp::Equals,
        TokenKind::Tilde => expect_equal(lexer, AttrOp::Includes)?,
        TokenKind::Pipe => expect_equal(lexer, AttrOp::DashMatch)?,
        TokenKind::Caret => expect_equal(lexer, AttrOp::Prefix)?,
        TokenKind::Dollar => expect_equal(lexer, AttrOp::Suffix)?,
        TokenKind::Asterisk => expect_equal(lexer, AttrOp::Substring)?,
        _ => {
            lexer.messages().error(
                format!("unexpected '{}' in attribute selector", op_token.kind),
                Some(op_token.location),
            );
            return None;
        }
    };

    lexer.skip_space();
    let value_token = lexer.next();
    let value = match value_token.kind {
        TokenKind::Ident(value) | TokenKind::QuotedString(value) => value,
        _ => {
            lexer.messages().error(
                "expected an attribute value",
                Some(value_token.location),
            );
            return None;
        }
    };

    lexer.skip_space();
    let mut case = CaseMode::Default;
    let tail = lexer.next();
    match tail.kind {
        TokenKind::RightBracket => {}
        TokenKind::Ident(flag) if flag.eq_ignore_ascii_case("i") => {
            case = CaseMode::Insensitive;
            close_bracket(lexer)?;
        }
        TokenKind::Ident(flag) if flag.eq_ignore_ascii_case("s") => {
            case = CaseMode::Sensitive;
            close_bracket(lexer)?;
        }
        _ => {
            lexer
                .messages()
                .error("expected ']' in attribute selector", Some(tail.location));
            return None;
        }
    }

    Some(SelectorFilter::Attribute {
        op,
        name,
        value,
        case,
    })
}

fn expect_equal(lexer: &mut Lexer, op: AttrOp) -> Option<AttrOp> {
    let token = lexer.next();
    if matches!(token.kind, TokenKind::Equal) {
        Some(op)
    } else {
        lexer.messages().error(
            "expected '=' in attribute selector operator",
            Some(token.location),
        );
        None
    }
}

fn close_bracket(lexer: &mut Lexer) -> Option<()> {
    lexer.skip_space();
    let token = lexer.next();
    if matches!(token.kind, TokenKind::RightBracket) {
        Some(())
    } else {
        lexer
            .messages()
            .error("expected ']' in attribute selector", Some(token.location));
        None
    }
}

/// A pseudo-class (or pseudo-element), the leading colon already
/// consumed.
fn parse_pseudo_filter(lexer: &mut Lexer) -> Option<SelectorFilter> {
    let mut token = lexer.next();
    let mut is_pseudo_element = false;
    if matches!(token.kind, TokenKind::Colon) {
        is_pseudo_element = true;
        token = lexer.next();
    }

    match token.kind {
        TokenKind::Ident(name) => {
            let name = name.to_ascii_lowercase();
            if is_pseudo_element {
                // Pseudo-elements are out of scope; they parse but never
                // match.
                lexer.messages().warning(
                    format!("pseudo-element '::{name}' is not supported"),
                    Some(token.location),
                );
                return Some(SelectorFilter::Unknown {
                    name,
                    argument: None,
                });
            }
            Some(match name.as_str() {
                "first-child" => SelectorFilter::FirstChild,
                "last-child" => SelectorFilter::LastChild,
                "empty" => SelectorFilter::Empty,
                "link" => SelectorFilter::Link,
                "visited" => SelectorFilter::Visited,
                "hover" => SelectorFilter::Hover,
                "active" => SelectorFilter::Active,
                "focus" => SelectorFilter::Focus,
                "enabled" => SelectorFilter::Enabled,
                "disabled" => SelectorFilter::Disabled,
                "checked" => SelectorFilter::Checked,
                "indeterminate" => SelectorFilter::Indeterminate,
                _ => {
                    lexer.messages().warning(
                        format!("unknown pseudo-class ':{name}'"),
                        Some(token.location),
                    );
                    SelectorFilter::Unknown {
                        name,
                        argument: None,
                    }
                }
            })
        }
        TokenKind::FunctionHead(name) => {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                "is" | "not" if !is_pseudo_element => {
                    let inner = parse_compound_selector(lexer)?;
                    lexer.skip_space();
                    let close = lexer.next();
                    if !matches!(close.kind, TokenKind::RightParen) {
                        lexer.messages().error(
                            format!("expected ')' to close ':{name}(...)'"),
                            Some(close.location),
                        );
                        return None;
                    }
                    Some(if name == "is" {
                        SelectorFilter::Is(Box::new(inner))
                    } else {
                        SelectorFilter::Not(Box::new(inner))
                    })
                }
                _ => {
                    let argument = collect_balanced_argument(lexer)?;
                    lexer.messages().warning(
                        format!("unknown pseudo-class ':{name}(...)'"),
                        Some(token.location),
                    );
                    Some(SelectorFilter::Unknown {
                        name,
                        argument: Some(argument),
                    })
                }
            }
        }
        _ => {
            lexer
                .messages()
                .error("expected a pseudo-class name after ':'", Some(token.location));
            None
        }
    }
}

/// Consume tokens up to the matching `)`, returning their text.
fn collect_balanced_argument(lexer: &mut Lexer) -> Option<String> {
    let mut depth = 1u32;
    let mut text = String::new();
    loop {
        let token: Token = lexer.next();
        match token.kind {
            TokenKind::LeftParen | TokenKind::FunctionHead(_) => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(text.trim().to_string());
                }
            }
            TokenKind::Eof => {
                lexer.messages().error(
                    "unterminated pseudo-class argument",
                    Some(token.location),
                );
                return None;
            }
            _ => {}
        }
        if depth > 0 {
            text.push_str(&token.kind.to_string());
        }
    }
}
