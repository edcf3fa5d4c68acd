//! Declarative grammar combinators for property values.
//!
//! Each known property describes its value syntax as a [`Matcher`] built
//! from the primitives and combinators here. Matchers are transactional:
//! [`Matcher::try_match`] saves the lexer position and the output length,
//! and restores both when the matcher fails, so alternatives can be tried
//! freely. Whitespace is skipped before every primitive.
//!
//! A successful match appends typed [`Component`]s to the output; the
//! per-property finish step interprets them.

use std::str::FromStr;
use std::sync::Arc;

use crate::property::PropertyId;
use crate::tokenizer::{Lexer, TokenKind};
use crate::value::{Color, Measure, Unit};

/// One parsed piece of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A numeric value with a unit (including the `auto` marker).
    Measure(Measure),
    /// A color.
    Color(Color),
    /// A recognized keyword, lowercased.
    Keyword(String),
    /// A raw identifier (font names, counter names).
    Ident(String),
    /// A quoted string.
    QuotedString(String),
    /// A `url(...)` argument.
    Uri(String),
    /// An integer.
    Integer(i32),
    /// A plain number.
    Number(f64),
    /// A `/` separator (font, border-radius).
    Slash,
    /// A `,` separator between list items.
    Comma,
    /// `rect(top, right, bottom, left)`.
    Rect([Measure; 4]),
    /// `counter(...)` / `counters(...)`.
    CounterRef {
        /// Counter name.
        name: String,
        /// `counters()` separator text, absent for `counter()`.
        separator: Option<String>,
        /// Marker style identifier, if given.
        style: Option<String>,
    },
    /// `attr(name)`.
    AttrRef(String),
    /// A nested sub-property match (shorthand composition).
    Sub(PropertyId, Vec<Component>),
}

type MatcherFn = dyn Fn(&mut Lexer, &mut Vec<Component>) -> bool + Send + Sync;

/// A transactional value matcher.
#[derive(Clone)]
pub struct Matcher(Arc<MatcherFn>);

impl Matcher {
    /// Wrap a raw matching function.
    pub fn new(f: impl Fn(&mut Lexer, &mut Vec<Component>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the matcher; on failure the lexer and the output are restored
    /// to their state at entry.
    pub fn try_match(&self, lexer: &mut Lexer, out: &mut Vec<Component>) -> bool {
        let position = lexer.position();
        let produced = out.len();
        if (self.0)(lexer, out) {
            true
        } else {
            out.truncate(produced);
            lexer.rewind(position);
            false
        }
    }
}

// ── primitives ─────────────────────────────────────────────────────────

/// A color: hex, named, `rgb()`/`rgba()`/`hsl()`/`hsla()`.
pub fn color() -> Matcher {
    Matcher::new(|lexer, out| match Color::parse(lexer) {
        Some(color) => {
            out.push(Component::Color(color));
            true
        }
        None => false,
    })
}

/// A `url(...)` value.
pub fn uri() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Url(value) => {
                out.push(Component::Uri(value));
                true
            }
            _ => false,
        }
    })
}

/// A whole number without a unit.
pub fn integer() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Number {
                value,
                suffix: None,
            } if value.fract() == 0.0 => {
                out.push(Component::Integer(value as i32));
                true
            }
            _ => false,
        }
    })
}

/// A number without a unit.
pub fn number() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Number {
                value,
                suffix: None,
            } => {
                out.push(Component::Number(value));
                true
            }
            _ => false,
        }
    })
}

/// A length (or unitless zero).
pub fn length() -> Matcher {
    Matcher::new(|lexer, out| match read_measure(lexer, false) {
        Some(measure) => {
            out.push(Component::Measure(measure));
            true
        }
        None => false,
    })
}

/// A length, percentage, or unitless zero.
pub fn length_or_percent() -> Matcher {
    Matcher::new(|lexer, out| match read_measure(lexer, true) {
        Some(measure) => {
            out.push(Component::Measure(measure));
            true
        }
        None => false,
    })
}

/// The `auto` keyword, recorded as the auto measure.
pub fn auto() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        if token.is_keyword("auto") {
            out.push(Component::Measure(Measure::auto()));
            true
        } else {
            false
        }
    })
}

/// An angle (deg, rad, grad).
pub fn angle() -> Matcher {
    dimension_class(Unit::is_angle)
}

/// A time (s, ms).
pub fn time() -> Matcher {
    dimension_class(Unit::is_time)
}

/// A frequency (Hz, kHz).
pub fn frequency() -> Matcher {
    dimension_class(Unit::is_frequency)
}

fn dimension_class(accepts: fn(Unit) -> bool) -> Matcher {
    Matcher::new(move |lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Number {
                value,
                suffix: Some(suffix),
            } => match Unit::from_suffix(&suffix) {
                Some(unit) if accepts(unit) => {
                    out.push(Component::Measure(Measure::new(value, unit)));
                    true
                }
                _ => false,
            },
            _ => false,
        }
    })
}

/// Any identifier, preserved verbatim.
pub fn ident() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Ident(name) => {
                out.push(Component::Ident(name));
                true
            }
            _ => false,
        }
    })
}

/// One or more identifiers, joined with single spaces (unquoted font
/// family names).
pub fn ident_sequence() -> Matcher {
    Matcher::new(|lexer, out| {
        let mut words = Vec::new();
        lexer.skip_space();
        loop {
            let token = lexer.peek();
            match token.kind {
                TokenKind::Ident(word) => {
                    let _ = lexer.next();
                    words.push(word);
                    // Whitespace between words is consumed on the next
                    // peek.
                    lexer.skip_space();
                }
                _ => break,
            }
        }
        if words.is_empty() {
            false
        } else {
            out.push(Component::Ident(words.join(" ")));
            true
        }
    })
}

/// A quoted string.
pub fn string_value() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::QuotedString(value) => {
                out.push(Component::QuotedString(value));
                true
            }
            _ => false,
        }
    })
}

/// Exactly the keyword `expected` (case-insensitive), recorded in its
/// canonical lowercase form.
pub fn keyword(expected: &'static str) -> Matcher {
    Matcher::new(move |lexer, out| {
        let token = lexer.next_non_space();
        if token.is_keyword(expected) {
            out.push(Component::Keyword(expected.to_ascii_lowercase()));
            true
        } else {
            false
        }
    })
}

/// Any keyword from `set`, recorded lowercased.
pub fn keyword_in(set: &'static [&'static str]) -> Matcher {
    Matcher::new(move |lexer, out| {
        let token = lexer.next_non_space();
        for expected in set {
            if token.is_keyword(expected) {
                out.push(Component::Keyword(expected.to_ascii_lowercase()));
                return true;
            }
        }
        false
    })
}

/// A keyword that names a variant of the enum `E` (hyphenated CSS
/// spelling).
pub fn enum_keyword<E: FromStr>() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::Ident(name) if E::from_str(&name).is_ok() => {
                out.push(Component::Keyword(name.to_ascii_lowercase()));
                true
            }
            _ => false,
        }
    })
}

/// A `/` separator.
pub fn slash() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        if matches!(token.kind, TokenKind::Slash) {
            out.push(Component::Slash);
            true
        } else {
            false
        }
    })
}

/// `rect(top, right, bottom, left)`; sides are lengths or `auto`,
/// separated by commas or whitespace.
pub fn rect() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        match token.kind {
            TokenKind::FunctionHead(name) if name.eq_ignore_ascii_case("rect") => {}
            _ => return false,
        }
        let mut sides = Vec::new();
        loop {
            let token = lexer.next_non_space();
            match token.kind {
                TokenKind::RightParen => break,
                TokenKind::Comma => {}
                TokenKind::Ident(word) if word.eq_ignore_ascii_case("auto") => {
                    sides.push(Measure::auto());
                }
                TokenKind::Number { value, suffix } => match suffix {
                    None if value == 0.0 => sides.push(Measure::zero()),
                    Some(s) => match Unit::from_suffix(&s) {
                        Some(unit) if unit.is_length() => sides.push(Measure::new(value, unit)),
                        _ => return false,
                    },
                    None => return false,
                },
                _ => return false,
            }
        }
        if sides.len() == 4 {
            out.push(Component::Rect([sides[0], sides[1], sides[2], sides[3]]));
            true
        } else {
            false
        }
    })
}

/// `counter(name [, style])`.
pub fn counter() -> Matcher {
    Matcher::new(|lexer, out| {
        if !function_head(lexer, "counter") {
            return false;
        }
        let name = match lexer.next_non_space().kind {
            TokenKind::Ident(name) => name,
            _ => return false,
        };
        let mut style = None;
        loop {
            match lexer.next_non_space().kind {
                TokenKind::RightParen => break,
                TokenKind::Comma => {}
                TokenKind::Ident(word) if style.is_none() => style = Some(word),
                _ => return false,
            }
        }
        out.push(Component::CounterRef {
            name,
            separator: None,
            style,
        });
        true
    })
}

/// `counters(name, "separator" [, style])`.
pub fn counters() -> Matcher {
    Matcher::new(|lexer, out| {
        if !function_head(lexer, "counters") {
            return false;
        }
        let name = match lexer.next_non_space().kind {
            TokenKind::Ident(name) => name,
            _ => return false,
        };
        if !matches!(lexer.next_non_space().kind, TokenKind::Comma) {
            return false;
        }
        let separator = match lexer.next_non_space().kind {
            TokenKind::QuotedString(text) => text,
            _ => return false,
        };
        let mut style = None;
        loop {
            match lexer.next_non_space().kind {
                TokenKind::RightParen => break,
                TokenKind::Comma => {}
                TokenKind::Ident(word) if style.is_none() => style = Some(word),
                _ => return false,
            }
        }
        out.push(Component::CounterRef {
            name,
            separator: Some(separator),
            style,
        });
        true
    })
}

/// `attr(name)`.
pub fn attr_fn() -> Matcher {
    Matcher::new(|lexer, out| {
        if !function_head(lexer, "attr") {
            return false;
        }
        let name = match lexer.next_non_space().kind {
            TokenKind::Ident(name) => name.to_ascii_lowercase(),
            _ => return false,
        };
        if !matches!(lexer.next_non_space().kind, TokenKind::RightParen) {
            return false;
        }
        out.push(Component::AttrRef(name));
        true
    })
}

fn function_head(lexer: &mut Lexer, expected: &str) -> bool {
    match lexer.next_non_space().kind {
        TokenKind::FunctionHead(name) => name.eq_ignore_ascii_case(expected),
        _ => false,
    }
}

/// `background-position`: one or two terms from {left, right, center,
/// top, bottom, length, percentage}. Always records two measures,
/// horizontal first.
pub fn background_position() -> Matcher {
    #[derive(Clone, Copy)]
    enum Term {
        Horizontal(Measure),
        Vertical(Measure),
        Center,
        Plain(Measure),
    }

    fn read_term(lexer: &mut Lexer) -> Option<Term> {
        let position = lexer.position();
        let token = lexer.next_non_space();
        let term = match &token.kind {
            TokenKind::Ident(word) => match word.to_ascii_lowercase().as_str() {
                "left" => Some(Term::Horizontal(Measure::percent(0.0))),
                "right" => Some(Term::Horizontal(Measure::percent(100.0))),
                "top" => Some(Term::Vertical(Measure::percent(0.0))),
                "bottom" => Some(Term::Vertical(Measure::percent(100.0))),
                "center" => Some(Term::Center),
                _ => None,
            },
            TokenKind::Percentage(value) => Some(Term::Plain(Measure::percent(*value))),
            TokenKind::Number { value, suffix } => match suffix {
                None if *value == 0.0 => Some(Term::Plain(Measure::zero())),
                Some(s) => Unit::from_suffix(s)
                    .filter(|u| u.is_length())
                    .map(|u| Term::Plain(Measure::new(*value, u))),
                None => None,
            },
            _ => None,
        };
        if term.is_none() {
            lexer.rewind(position);
        }
        term
    }

    Matcher::new(|lexer, out| {
        let Some(first) = read_term(lexer) else {
            return false;
        };
        let second = read_term(lexer);
        let center = Measure::percent(50.0);
        let (x, y) = match (first, second) {
            (Term::Horizontal(x), None) => (x, center),
            (Term::Vertical(y), None) => (center, y),
            (Term::Center, None) => (center, center),
            (Term::Plain(x), None) => (x, center),
            (a, Some(b)) => {
                let horizontal = |t: Term| match t {
                    Term::Horizontal(m) | Term::Plain(m) => Some(m),
                    Term::Center => Some(center),
                    Term::Vertical(_) => None,
                };
                let vertical = |t: Term| match t {
                    Term::Vertical(m) | Term::Plain(m) => Some(m),
                    Term::Center => Some(center),
                    Term::Horizontal(_) => None,
                };
                // Keyword order is free; plain values are positional.
                match (horizontal(a), vertical(b)) {
                    (Some(x), Some(y)) => (x, y),
                    _ => match (horizontal(b), vertical(a)) {
                        (Some(x), Some(y)) => (x, y),
                        _ => return false,
                    },
                }
            }
        };
        out.push(Component::Measure(x));
        out.push(Component::Measure(y));
        true
    })
}

/// One shadow of a `box-shadow`/`text-shadow` list: `inset`, a color,
/// and 2-4 lengths, in any order (color and `inset` before or after the
/// lengths).
pub fn shadow() -> Matcher {
    Matcher::new(|lexer, out| {
        let mut lengths: Vec<Measure> = Vec::new();
        let mut color_value: Option<Color> = None;
        let mut inset = false;
        loop {
            let position = lexer.position();
            let token = lexer.next_non_space();
            match &token.kind {
                TokenKind::Ident(word)
                    if word.eq_ignore_ascii_case("inset") && !inset =>
                {
                    inset = true;
                }
                TokenKind::Number { value, suffix } if lengths.len() < 4 => {
                    let measure = match suffix {
                        None if *value == 0.0 => Measure::zero(),
                        Some(s) => match Unit::from_suffix(s) {
                            Some(unit) if unit.is_length() => Measure::new(*value, unit),
                            _ => {
                                lexer.rewind(position);
                                break;
                            }
                        },
                        None => {
                            lexer.rewind(position);
                            break;
                        }
                    };
                    lengths.push(measure);
                }
                _ if color_value.is_none() => {
                    lexer.rewind(position);
                    match Color::parse(lexer) {
                        Some(c) => color_value = Some(c),
                        None => break,
                    }
                }
                _ => {
                    lexer.rewind(position);
                    break;
                }
            }
        }
        if lengths.len() < 2 {
            return false;
        }
        if inset {
            out.push(Component::Keyword("inset".to_string()));
        }
        for measure in lengths {
            out.push(Component::Measure(measure));
        }
        if let Some(c) = color_value {
            out.push(Component::Color(c));
        }
        true
    })
}

fn read_measure(lexer: &mut Lexer, allow_percent: bool) -> Option<Measure> {
    let token = lexer.next_non_space();
    match token.kind {
        TokenKind::Percentage(value) if allow_percent => Some(Measure::percent(value)),
        TokenKind::Number { value, suffix } => match suffix {
            None if value == 0.0 => Some(Measure::zero()),
            Some(s) => Unit::from_suffix(&s)
                .filter(|u| u.is_length())
                .map(|u| Measure::new(value, u)),
            None => None,
        },
        _ => None,
    }
}

// ── combinators ────────────────────────────────────────────────────────

/// All of `parts`, in order.
pub fn sequence(parts: Vec<Matcher>) -> Matcher {
    Matcher::new(move |lexer, out| parts.iter().all(|part| part.try_match(lexer, out)))
}

/// The first of `alternatives` that matches.
pub fn one_of(alternatives: Vec<Matcher>) -> Matcher {
    Matcher::new(move |lexer, out| {
        alternatives
            .iter()
            .any(|alternative| alternative.try_match(lexer, out))
    })
}

/// Zero or one occurrence of `part`; always succeeds.
pub fn optional(part: Matcher) -> Matcher {
    Matcher::new(move |lexer, out| {
        let _ = part.try_match(lexer, out);
        true
    })
}

/// Each of `parts` at most once, in any order; at least one must match.
pub fn any_order(parts: Vec<Matcher>) -> Matcher {
    Matcher::new(move |lexer, out| {
        let mut used = vec![false; parts.len()];
        let mut matched_any = false;
        loop {
            let mut advanced = false;
            for (index, part) in parts.iter().enumerate() {
                if !used[index] && part.try_match(lexer, out) {
                    used[index] = true;
                    matched_any = true;
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                return matched_any;
            }
        }
    })
}

/// Between `min` and `max` occurrences of `part`.
pub fn range(min: usize, max: usize, part: Matcher) -> Matcher {
    Matcher::new(move |lexer, out| {
        let mut count = 0;
        while count < max && part.try_match(lexer, out) {
            count += 1;
        }
        count >= min
    })
}

/// Any number of occurrences of `part` (including none).
pub fn zero_or_more(part: Matcher) -> Matcher {
    range(0, usize::MAX, part)
}

/// At least one occurrence of `part`.
pub fn one_or_more(part: Matcher) -> Matcher {
    range(1, usize::MAX, part)
}

/// A non-empty comma-separated list of `part`; a [`Component::Comma`] is
/// recorded between items.
pub fn comma_list(part: Matcher) -> Matcher {
    Matcher::new(move |lexer, out| {
        if !part.try_match(lexer, out) {
            return false;
        }
        loop {
            let position = lexer.position();
            let token = lexer.next_non_space();
            if !matches!(token.kind, TokenKind::Comma) {
                lexer.rewind(position);
                return true;
            }
            out.push(Component::Comma);
            if !part.try_match(lexer, out) {
                return false;
            }
        }
    })
}

/// A possibly-empty comma-separated list of `part`.
pub fn comma_list_optional(part: Matcher) -> Matcher {
    optional(comma_list(part))
}

/// `first`, then optionally `second`.
pub fn then_optional(first: Matcher, second: Matcher) -> Matcher {
    sequence(vec![first, optional(second)])
}

/// Match another property's grammar and record its components as a
/// nested group. This is how shorthands compose their sub-properties.
pub fn sub_property(id: PropertyId) -> Matcher {
    Matcher::new(move |lexer, out| {
        let Some(grammar) = crate::property::property_grammar(id) else {
            return false;
        };
        let mut inner = Vec::new();
        if grammar.try_match(lexer, &mut inner) {
            out.push(Component::Sub(id, inner));
            true
        } else {
            false
        }
    })
}

// ── component helpers ──────────────────────────────────────────────────

/// The first color among `components`.
#[must_use]
pub fn first_color(components: &[Component]) -> Option<Color> {
    components.iter().find_map(|c| match c {
        Component::Color(color) => Some(*color),
        _ => None,
    })
}

/// The first measure among `components`.
#[must_use]
pub fn first_measure(components: &[Component]) -> Option<Measure> {
    components.iter().find_map(|c| match c {
        Component::Measure(measure) => Some(*measure),
        _ => None,
    })
}

/// All measures among `components`, in order.
#[must_use]
pub fn measures(components: &[Component]) -> Vec<Measure> {
    components
        .iter()
        .filter_map(|c| match c {
            Component::Measure(measure) => Some(*measure),
            _ => None,
        })
        .collect()
}

/// The first keyword among `components`.
#[must_use]
pub fn first_keyword(components: &[Component]) -> Option<&str> {
    components.iter().find_map(|c| match c {
        Component::Keyword(word) => Some(word.as_str()),
        _ => None,
    })
}

/// True if `components` contains the given keyword.
#[must_use]
pub fn has_keyword(components: &[Component], expected: &str) -> bool {
    components
        .iter()
        .any(|c| matches!(c, Component::Keyword(word) if word == expected))
}

/// Split `components` on the comma markers produced by [`comma_list`].
#[must_use]
pub fn split_commas(components: &[Component]) -> Vec<&[Component]> {
    components
        .split(|c| matches!(c, Component::Comma))
        .collect()
}

/// Expand 1-4 side values to `[top, right, bottom, left]` per the CSS
/// shorthand convention.
#[must_use]
pub fn expand_sides(values: &[Measure]) -> Option<[Measure; 4]> {
    match values {
        [all] => Some([*all; 4]),
        [vertical, horizontal] => Some([*vertical, *horizontal, *vertical, *horizontal]),
        [top, horizontal, bottom] => Some([*top, *horizontal, *bottom, *horizontal]),
        [top, right, bottom, left] => Some([*top, *right, *bottom, *left]),
        _ => None,
    }
}
