//! Style properties.
//!
//! [`PropertyId`] enumerates every known property (CSS 2.1 minus the
//! deprecated aural set, plus the flex family, border-radius, shadows,
//! box-sizing, background-size, outline-offset, and the overflow axes).
//! A parsed declaration is a [`StyleProperty`]: the id, the parsed value,
//! and the CSS-wide flags. Unknown or unparseable declarations are kept
//! as token runs so they round-trip and stay inert in the cascade.

mod apply;
mod decompose;
mod table;

pub use table::property_grammar;

use std::str::FromStr;
use std::sync::Arc;

use crate::grammar::Component;
use crate::tokenizer::{Lexer, Token, TokenKind};

/// Every property this engine knows how to parse and apply.
#[expect(missing_docs, reason = "variant names mirror the CSS property names")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PropertyId {
    // Background
    BackgroundAttachment,
    BackgroundColor,
    BackgroundImage,
    BackgroundPosition,
    BackgroundRepeat,
    BackgroundSize,
    // Border model
    BorderCollapse,
    BorderSpacing,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderTopStyle,
    BorderRightStyle,
    BorderBottomStyle,
    BorderLeftStyle,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    // Box
    Bottom,
    BoxShadow,
    BoxSizing,
    CaptionSide,
    Clear,
    Clip,
    Color,
    Content,
    CounterIncrement,
    CounterReset,
    Cursor,
    Direction,
    Display,
    EmptyCells,
    Float,
    FontFamily,
    FontSize,
    FontStyle,
    FontVariant,
    FontWeight,
    Height,
    Left,
    LetterSpacing,
    LineHeight,
    ListStyleImage,
    ListStylePosition,
    ListStyleType,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    MaxHeight,
    MaxWidth,
    MinHeight,
    MinWidth,
    Opacity,
    Orphans,
    OutlineColor,
    OutlineOffset,
    OutlineStyle,
    OutlineWidth,
    OverflowX,
    OverflowY,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    PageBreakAfter,
    PageBreakBefore,
    PageBreakInside,
    Position,
    Quotes,
    Right,
    TableLayout,
    TextAlign,
    TextDecoration,
    TextIndent,
    TextShadow,
    TextTransform,
    Top,
    UnicodeBidi,
    VerticalAlign,
    Visibility,
    WhiteSpace,
    Widows,
    Width,
    WordSpacing,
    ZIndex,
    // Flex
    AlignContent,
    AlignItems,
    AlignSelf,
    FlexBasis,
    FlexDirection,
    FlexGrow,
    FlexShrink,
    FlexWrap,
    JustifyContent,
    Order,
    // Shorthands
    Background,
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    BorderColor,
    BorderStyle,
    BorderWidth,
    BorderRadius,
    Flex,
    FlexFlow,
    Font,
    ListStyle,
    Margin,
    Outline,
    Overflow,
    Padding,
    /// Not a real property; carries preserved tokens.
    #[strum(disabled)]
    Unknown,
}

impl PropertyId {
    /// Look up a property by its CSS name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::from_str(name).unwrap_or(Self::Unknown)
    }

    /// True for properties that decompose into longhands.
    #[must_use]
    pub fn is_shorthand(self) -> bool {
        !self.sub_properties().is_empty()
    }

    /// The longhands a shorthand expands to (empty for longhands).
    #[must_use]
    pub fn sub_properties(self) -> &'static [PropertyId] {
        use PropertyId::*;
        match self {
            Margin => &[MarginTop, MarginRight, MarginBottom, MarginLeft],
            Padding => &[PaddingTop, PaddingRight, PaddingBottom, PaddingLeft],
            BorderWidth => &[
                BorderTopWidth,
                BorderRightWidth,
                BorderBottomWidth,
                BorderLeftWidth,
            ],
            BorderStyle => &[
                BorderTopStyle,
                BorderRightStyle,
                BorderBottomStyle,
                BorderLeftStyle,
            ],
            BorderColor => &[
                BorderTopColor,
                BorderRightColor,
                BorderBottomColor,
                BorderLeftColor,
            ],
            BorderTop => &[BorderTopWidth, BorderTopStyle, BorderTopColor],
            BorderRight => &[BorderRightWidth, BorderRightStyle, BorderRightColor],
            BorderBottom => &[BorderBottomWidth, BorderBottomStyle, BorderBottomColor],
            BorderLeft => &[BorderLeftWidth, BorderLeftStyle, BorderLeftColor],
            Border => &[
                BorderTopWidth,
                BorderRightWidth,
                BorderBottomWidth,
                BorderLeftWidth,
                BorderTopStyle,
                BorderRightStyle,
                BorderBottomStyle,
                BorderLeftStyle,
                BorderTopColor,
                BorderRightColor,
                BorderBottomColor,
                BorderLeftColor,
            ],
            BorderRadius => &[
                BorderTopLeftRadius,
                BorderTopRightRadius,
                BorderBottomRightRadius,
                BorderBottomLeftRadius,
            ],
            Background => &[
                BackgroundColor,
                BackgroundImage,
                BackgroundRepeat,
                BackgroundAttachment,
                BackgroundPosition,
                BackgroundSize,
            ],
            Font => &[
                FontStyle,
                FontVariant,
                FontWeight,
                FontSize,
                LineHeight,
                FontFamily,
            ],
            ListStyle => &[ListStyleType, ListStylePosition, ListStyleImage],
            Flex => &[FlexGrow, FlexShrink, FlexBasis],
            FlexFlow => &[FlexDirection, FlexWrap],
            Outline => &[OutlineWidth, OutlineStyle, OutlineColor],
            Overflow => &[OverflowX, OverflowY],
            _ => &[],
        }
    }
}

/// The CSS-wide flags of one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyFlags {
    /// The body was the `inherit` keyword.
    pub inherit: bool,
    /// The body was the `initial` keyword.
    pub initial: bool,
    /// The body was the `unset` keyword.
    pub unset: bool,
    /// The declaration carried `!important`.
    pub important: bool,
    /// False when the body failed to parse and is preserved as tokens.
    pub valid: bool,
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            inherit: false,
            initial: false,
            unset: false,
            important: false,
            valid: true,
        }
    }
}

/// The parsed value of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Components produced by the property's grammar.
    Parsed(Vec<Component>),
    /// An unknown or invalid body, preserved for round-tripping.
    Raw {
        /// The property name as written.
        name: String,
        /// The body tokens, bracket-balanced.
        tokens: Vec<Token>,
    },
    /// No value: the body was a CSS-wide keyword.
    None,
}

/// One parsed declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProperty {
    /// Which property this sets.
    pub id: PropertyId,
    /// The parsed value.
    pub value: PropertyValue,
    /// CSS-wide flags.
    pub flags: PropertyFlags,
}

impl StyleProperty {
    /// The parsed components, empty for raw/flag-only values.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        match &self.value {
            PropertyValue::Parsed(components) => components,
            _ => &[],
        }
    }

    /// Apply this property to `style`, returning the updated style.
    ///
    /// Unknown and invalid properties are identity. Shorthands apply each
    /// of their decomposed longhands.
    #[must_use]
    pub fn apply(&self, style: &crate::style::ComputedStyle) -> crate::style::ComputedStyle {
        apply::apply(self, style)
    }

    /// Import this property's value from `source` into `dest`. Used for
    /// `inherit` (source = parent) and `initial` (source = default).
    #[must_use]
    pub fn copy_property(
        &self,
        dest: &crate::style::ComputedStyle,
        source: &crate::style::ComputedStyle,
    ) -> crate::style::ComputedStyle {
        apply::copy_property(self.id, dest, source)
    }

    /// The equivalent longhand properties. Longhands yield themselves;
    /// shorthands split their parsed components, producing
    /// `initial`-flagged longhands for omitted parts.
    #[must_use]
    pub fn decompose(&self) -> Vec<StyleProperty> {
        decompose::decompose(self)
    }
}

/// An immutable ordered list of properties (one rule body).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylePropertySet {
    properties: Arc<[StyleProperty]>,
}

impl StylePropertySet {
    /// Wrap a parsed declaration list.
    #[must_use]
    pub fn new(properties: Vec<StyleProperty>) -> Self {
        Self {
            properties: properties.into(),
        }
    }

    /// The properties in source order.
    #[must_use]
    pub fn properties(&self) -> &[StyleProperty] {
        &self.properties
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True if the rule body was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate the declarations in source order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleProperty> {
        self.properties.iter()
    }
}

// ── declaration parsing ────────────────────────────────────────────────

/// Parse one declaration (`name : value !important?`).
///
/// Never fails outright: malformed input is preserved as an
/// unknown-property token container and a diagnostic is recorded. The
/// trailing `;`/`}` terminator is left unconsumed for the caller.
pub fn parse_declaration(lexer: &mut Lexer) -> StyleProperty {
    lexer.skip_space();
    let name_token = lexer.next();
    let name = match name_token.kind {
        TokenKind::Ident(ref name) => name.clone(),
        _ => {
            lexer.messages().error(
                "expected a property name",
                Some(name_token.location.clone()),
            );
            lexer.unget(name_token);
            return unknown_container(String::new(), lexer);
        }
    };

    lexer.skip_space();
    let colon = lexer.next();
    if !matches!(colon.kind, TokenKind::Colon) {
        lexer.messages().error(
            format!("expected ':' after property name '{name}'"),
            Some(colon.location.clone()),
        );
        lexer.unget(colon);
        return unknown_container(name, lexer);
    }

    let id = PropertyId::from_name(&name);
    if id == PropertyId::Unknown {
        lexer.messages().warning(
            format!("unknown property '{name}'"),
            Some(colon.location),
        );
        return unknown_container(name, lexer);
    }

    let body_start = lexer.position();

    // A body that is exactly one CSS-wide keyword skips the grammar.
    if let Some(flagged) = parse_wide_keyword(lexer, id) {
        return flagged;
    }

    let grammar = property_grammar(id).expect("every known property has a grammar");
    let mut components = Vec::new();
    if grammar.try_match(lexer, &mut components) {
        let mut flags = PropertyFlags::default();
        if read_declaration_tail(lexer, &mut flags) {
            return StyleProperty {
                id,
                value: PropertyValue::Parsed(components),
                flags,
            };
        }
    }

    // The grammar failed (or trailing junk followed it): preserve the
    // body as tokens.
    lexer.rewind(body_start);
    lexer.messages().error(
        format!("invalid value for property '{name}'"),
        Some(colon.location),
    );
    let mut container = unknown_container(name, lexer);
    container.id = id;
    container
}

/// `inherit` / `initial` / `unset` as the entire body.
fn parse_wide_keyword(lexer: &mut Lexer, id: PropertyId) -> Option<StyleProperty> {
    let start = lexer.position();
    let token = lexer.next_non_space();
    let word = match &token.kind {
        TokenKind::Ident(word) => word.to_ascii_lowercase(),
        _ => {
            lexer.rewind(start);
            return None;
        }
    };
    let mut flags = PropertyFlags::default();
    match word.as_str() {
        "inherit" => flags.inherit = true,
        "initial" => flags.initial = true,
        "unset" => flags.unset = true,
        _ => {
            lexer.rewind(start);
            return None;
        }
    }
    if !read_declaration_tail(lexer, &mut flags) {
        // Something follows the keyword, so it was a value term after
        // all (and the grammar will reject it properly).
        lexer.rewind(start);
        return None;
    }
    Some(StyleProperty {
        id,
        value: PropertyValue::None,
        flags,
    })
}

/// Optional `!important`, then a declaration terminator. Leaves the
/// terminator unconsumed. False if other input follows.
fn read_declaration_tail(lexer: &mut Lexer, flags: &mut PropertyFlags) -> bool {
    let token = lexer.next_non_space();
    match token.kind {
        TokenKind::Important => {
            flags.important = true;
            let after = lexer.next_non_space();
            let done = is_declaration_end(&after.kind);
            lexer.unget(after);
            done
        }
        ref kind if is_declaration_end(kind) => {
            lexer.unget(token);
            true
        }
        _ => false,
    }
}

fn is_declaration_end(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
    )
}

/// Build an unknown-property container from the remaining body tokens.
fn unknown_container(name: String, lexer: &mut Lexer) -> StyleProperty {
    let mut tokens = collect_invalid_tokens(lexer);
    let important = strip_trailing_important(&mut tokens);
    StyleProperty {
        id: PropertyId::Unknown,
        value: PropertyValue::Raw { name, tokens },
        flags: PropertyFlags {
            important,
            valid: false,
            ..PropertyFlags::default()
        },
    }
}

/// Collect tokens up to the next `;`, `}`, `)`, `]` or EOF, respecting
/// bracket nesting: each bracket kind balances independently, and a
/// closer only terminates the run when its own kind is balanced.
fn collect_invalid_tokens(lexer: &mut Lexer) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut parens = 0u32;
    let mut brackets = 0u32;
    let mut braces = 0u32;
    loop {
        let token = lexer.peek();
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Semicolon if parens == 0 && brackets == 0 && braces == 0 => break,
            TokenKind::RightParen if parens == 0 => break,
            TokenKind::RightBracket if brackets == 0 => break,
            TokenKind::RightBrace if braces == 0 => break,
            TokenKind::LeftParen | TokenKind::FunctionHead(_) => parens += 1,
            TokenKind::RightParen => parens -= 1,
            TokenKind::LeftBracket => brackets += 1,
            TokenKind::RightBracket => brackets -= 1,
            TokenKind::LeftBrace => braces += 1,
            TokenKind::RightBrace => braces -= 1,
            _ => {}
        }
        tokens.push(lexer.next());
    }
    tokens
}

/// Remove a trailing `!important` (and surrounding whitespace) from a
/// preserved token run, reporting whether it was present.
fn strip_trailing_important(tokens: &mut Vec<Token>) -> bool {
    while tokens.last().is_some_and(Token::is_space) {
        let _ = tokens.pop();
    }
    if tokens
        .last()
        .is_some_and(|t| matches!(t.kind, TokenKind::Important))
    {
        let _ = tokens.pop();
        while tokens.last().is_some_and(Token::is_space) {
            let _ = tokens.pop();
        }
        return true;
    }
    false
}
