//! Embeddable CSS engine: tokenizer, selectors, property parsers,
//! cascade, and computed styles.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** — a pull lexer for CSS 2.1 with rewind/unget, escape
//!   handling, and non-fatal error reporting ([`tokenizer`]).
//! - **Selectors** — the selector model with combinators, specificity,
//!   right-to-left tree matching, a token-driven parser, and a
//!   cost-based query planner for `find()` ([`selector`]).
//! - **Property parsers** — a grammar-combinator DSL and a per-property
//!   table covering CSS 2.1 plus the flex family, border-radius,
//!   shadows, box-sizing, background-size, outline-offset, and the
//!   overflow axes ([`grammar`], [`property`]).
//! - **Computed styles** — an immutable copy-on-write style record
//!   partitioned into six shared bags ([`style`]).
//! - **Style manager** — indexed rule lookup and the cascade
//!   ([`manager`]).
//!
//! The element tree is consumed through the `moss-dom` arena; parsing
//! diagnostics flow into the shared [`Messages`] sink and never panic
//! or abort a parse.
//!
//! # Example
//!
//! ```
//! use moss_css::StyleManager;
//! use moss_dom::{DomTree, ElementData, NodeId, NodeKind};
//!
//! let mut tree = DomTree::new();
//! let mut p = ElementData::new("p");
//! p.set_attribute("class", "lead");
//! let p = tree.alloc(NodeKind::Element(p));
//! tree.append_child(NodeId::ROOT, p);
//!
//! let mut manager = StyleManager::new();
//! let _ = manager.add_stylesheet(".lead { color: #333; }", "inline.css");
//! let style = manager.compute_style(&tree, p, None);
//! assert_eq!(style.color().to_hex_string(), "#333333");
//! ```

/// Grammar combinators for property values.
pub mod grammar;
/// The style manager: rule indices and the cascade.
pub mod manager;
/// Parse diagnostics and the public error type.
pub mod messages;
/// Stylesheet parsing.
pub mod parser;
/// Known properties, declaration parsing, apply/copy/decompose.
pub mod property;
/// Selector model, parser, matching, specificity, query planner.
pub mod selector;
/// The computed-style tree.
pub mod style;
/// CSS tokenization.
pub mod tokenizer;
/// Measures, colors, and keyword enums.
pub mod value;

pub use manager::{MatchedRule, StyleManager};
pub use messages::{CssError, Message, MessageKind, Messages};
pub use parser::{StyleRule, Stylesheet};
pub use property::{PropertyFlags, PropertyId, PropertyValue, StyleProperty, StylePropertySet};
pub use selector::{
    AttrOp, CaseMode, Combinator, CompoundSelector, QueryPlan, Selector, SelectorComponent,
    SelectorFilter, SimpleSelector, Specificity,
};
pub use style::ComputedStyle;
pub use tokenizer::{Lexer, SourceLocation, Token, TokenKind};
pub use value::{Color, Measure, Unit};
