//! Stylesheet parsing.
//!
//! A stylesheet is a flat list of style rules in source order. Parsing
//! never fails: malformed rules are skipped to the next `}` with a
//! diagnostic, malformed declarations are preserved as inert token runs,
//! and at-rules are consumed (balanced) and reported.

use std::sync::Arc;

use crate::messages::Messages;
use crate::property::{self, StylePropertySet};
use crate::selector::{CompoundSelector, parse_compound_selector};
use crate::tokenizer::{Lexer, SourceLocation, TokenKind};

/// One rule: a selector list and its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The comma-separated selector list.
    pub selector: CompoundSelector,
    /// The declarations between the braces.
    pub properties: StylePropertySet,
    /// Where the rule started.
    pub location: SourceLocation,
}

/// An immutable parsed stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    filename: Arc<str>,
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Parse stylesheet text. Diagnostics go to `messages`; the returned
    /// sheet contains every rule that survived recovery, in source
    /// order.
    #[must_use]
    pub fn parse(text: &str, filename: &str, messages: &Messages) -> Self {
        let mut lexer = Lexer::new(text, filename, messages.clone());
        let mut rules = Vec::new();

        loop {
            let token = lexer.peek();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Space | TokenKind::Cdo | TokenKind::Cdc => {
                    let _ = lexer.next();
                }
                TokenKind::AtKeyword(name) => {
                    let name = name.clone();
                    let _ = lexer.next();
                    messages.warning(
                        format!("@{name} rules are not supported; rule skipped"),
                        Some(token.location),
                    );
                    skip_at_rule(&mut lexer);
                }
                TokenKind::RightBrace => {
                    messages.error("unexpected '}'", Some(token.location));
                    let _ = lexer.next();
                }
                _ => {
                    if let Some(rule) = parse_rule(&mut lexer) {
                        rules.push(rule);
                    }
                }
            }
        }

        Self {
            filename: Arc::clone(lexer.filename()),
            rules,
        }
    }

    /// The rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no rule survived parsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The name this sheet was parsed under.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// `selector-list '{' declarations '}'`. `None` after recovery if the
/// selector or the opening brace is bad.
fn parse_rule(lexer: &mut Lexer) -> Option<StyleRule> {
    let location = lexer.peek().location;

    let Some(selector) = parse_compound_selector(lexer) else {
        skip_to_rule_end(lexer);
        return None;
    };

    lexer.skip_space();
    let brace = lexer.next();
    if !matches!(brace.kind, TokenKind::LeftBrace) {
        lexer
            .messages()
            .error("expected '{' after selector", Some(brace.location));
        skip_to_rule_end(lexer);
        return None;
    }

    let properties = parse_declaration_list(lexer);
    Some(StyleRule {
        selector,
        properties,
        location,
    })
}

/// The `;`-separated declarations of one rule, consuming the closing
/// `}`.
fn parse_declaration_list(lexer: &mut Lexer) -> StylePropertySet {
    let mut properties = Vec::new();
    loop {
        lexer.skip_space();
        let token = lexer.peek();
        match token.kind {
            TokenKind::RightBrace => {
                let _ = lexer.next();
                break;
            }
            TokenKind::Eof => {
                lexer
                    .messages()
                    .error("unclosed rule at end of stylesheet", Some(token.location));
                break;
            }
            TokenKind::Semicolon => {
                let _ = lexer.next();
            }
            _ => {
                properties.push(property::parse_declaration(lexer));
            }
        }
    }
    StylePropertySet::new(properties)
}

/// Skip past the current malformed rule: to the end of its block if one
/// opens, otherwise to the next block's end or EOF.
fn skip_to_rule_end(lexer: &mut Lexer) {
    let mut depth = 0u32;
    loop {
        let token = lexer.next();
        match token.kind {
            TokenKind::Eof => return,
            TokenKind::LeftBrace => depth += 1,
            TokenKind::RightBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Skip an at-rule: up to a `;` at top level, or past its balanced
/// block.
fn skip_at_rule(lexer: &mut Lexer) {
    let mut depth = 0u32;
    loop {
        let token = lexer.next();
        match token.kind {
            TokenKind::Eof => return,
            TokenKind::Semicolon if depth == 0 => return,
            TokenKind::LeftBrace => depth += 1,
            TokenKind::RightBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}
