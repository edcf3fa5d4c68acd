//! The per-property grammar table.
//!
//! One grammar per known property, built from the combinators in
//! [`crate::grammar`]. Shorthands compose the grammars of their
//! sub-properties with [`sub_property`] where the longhand grammar is
//! reusable as-is, and spell out the syntax where it is not.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::grammar::{
    Matcher, any_order, attr_fn, auto, background_position, color, comma_list, counter, counters,
    enum_keyword, ident, ident_sequence, integer, keyword, keyword_in, length, length_or_percent,
    number, one_of, one_or_more, optional, range, sequence, shadow, slash, string_value,
    sub_property, then_optional, uri,
};
use crate::value as v;

use super::PropertyId;

/// `<length> | <percentage> | auto`
fn measure_or_auto() -> Matcher {
    one_of(vec![length_or_percent(), auto()])
}

/// `thin | medium | thick | <length>`
fn border_width() -> Matcher {
    one_of(vec![length(), keyword_in(&["thin", "medium", "thick"])])
}

/// `<font-size> body: length, percentage, or a size keyword.`
fn font_size_value() -> Matcher {
    one_of(vec![
        length_or_percent(),
        keyword_in(&[
            "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "larger",
            "smaller",
        ]),
    ])
}

/// `normal | <number> | <length> | <percentage>`
fn line_height_value() -> Matcher {
    one_of(vec![
        keyword("normal"),
        number(),
        length_or_percent(),
    ])
}

/// A single background layer (color excluded; it may only appear once
/// per shorthand).
fn background_layer() -> Matcher {
    any_order(vec![
        color(),
        one_of(vec![uri(), keyword("none")]),
        enum_keyword::<v::BackgroundRepeat>(),
        enum_keyword::<v::BackgroundAttachment>(),
        then_optional(
            background_position(),
            sequence(vec![slash(), background_size_value()]),
        ),
    ])
}

/// `cover | contain | [<length>|<percent>|auto]{1,2}`
fn background_size_value() -> Matcher {
    one_of(vec![
        keyword("cover"),
        keyword("contain"),
        range(1, 2, measure_or_auto()),
    ])
}

/// `none | [counter name, optional integer]+`
fn counter_list() -> Matcher {
    one_of(vec![
        keyword("none"),
        one_or_more(then_optional(ident(), integer())),
    ])
}

static GRAMMARS: LazyLock<HashMap<PropertyId, Matcher>> = LazyLock::new(|| {
    use PropertyId::*;
    let mut table = HashMap::new();
    let mut add = |id: PropertyId, grammar: Matcher| {
        let _ = table.insert(id, grammar);
    };

    // ── background ─────────────────────────────────────────────────────
    add(BackgroundAttachment, enum_keyword::<v::BackgroundAttachment>());
    add(BackgroundColor, color());
    add(BackgroundImage, one_of(vec![uri(), keyword("none")]));
    add(BackgroundPosition, background_position());
    add(BackgroundRepeat, enum_keyword::<v::BackgroundRepeat>());
    add(BackgroundSize, background_size_value());
    add(Background, comma_list(background_layer()));

    // ── borders ────────────────────────────────────────────────────────
    add(BorderCollapse, enum_keyword::<v::BorderCollapse>());
    add(BorderSpacing, range(1, 2, length()));
    for id in [
        BorderTopColor,
        BorderRightColor,
        BorderBottomColor,
        BorderLeftColor,
    ] {
        add(id, color());
    }
    for id in [
        BorderTopStyle,
        BorderRightStyle,
        BorderBottomStyle,
        BorderLeftStyle,
    ] {
        add(id, enum_keyword::<v::BorderStyle>());
    }
    for id in [
        BorderTopWidth,
        BorderRightWidth,
        BorderBottomWidth,
        BorderLeftWidth,
    ] {
        add(id, border_width());
    }
    for id in [
        BorderTopLeftRadius,
        BorderTopRightRadius,
        BorderBottomRightRadius,
        BorderBottomLeftRadius,
    ] {
        add(id, range(1, 2, length_or_percent()));
    }
    add(
        BorderRadius,
        then_optional(
            range(1, 4, length_or_percent()),
            sequence(vec![slash(), range(1, 4, length_or_percent())]),
        ),
    );
    let border_side = || {
        any_order(vec![
            border_width(),
            enum_keyword::<v::BorderStyle>(),
            color(),
        ])
    };
    add(Border, border_side());
    add(BorderTop, border_side());
    add(BorderRight, border_side());
    add(BorderBottom, border_side());
    add(BorderLeft, border_side());
    add(BorderColor, range(1, 4, color()));
    add(BorderStyle, range(1, 4, enum_keyword::<v::BorderStyle>()));
    add(BorderWidth, range(1, 4, border_width()));

    // ── box model ──────────────────────────────────────────────────────
    add(Width, measure_or_auto());
    add(Height, measure_or_auto());
    add(MinWidth, length_or_percent());
    add(MinHeight, length_or_percent());
    add(MaxWidth, one_of(vec![length_or_percent(), keyword("none")]));
    add(MaxHeight, one_of(vec![length_or_percent(), keyword("none")]));
    for id in [MarginTop, MarginRight, MarginBottom, MarginLeft] {
        add(id, measure_or_auto());
    }
    add(Margin, range(1, 4, measure_or_auto()));
    for id in [PaddingTop, PaddingRight, PaddingBottom, PaddingLeft] {
        add(id, length_or_percent());
    }
    add(Padding, range(1, 4, length_or_percent()));
    for id in [Top, Right, Bottom, Left] {
        add(id, measure_or_auto());
    }
    add(BoxSizing, enum_keyword::<v::BoxSizing>());

    // ── positioning and flow ───────────────────────────────────────────
    add(Display, enum_keyword::<v::Display>());
    add(Position, enum_keyword::<v::Position>());
    add(Float, enum_keyword::<v::Float>());
    add(Clear, enum_keyword::<v::Clear>());
    add(Visibility, enum_keyword::<v::Visibility>());
    add(OverflowX, enum_keyword::<v::Overflow>());
    add(OverflowY, enum_keyword::<v::Overflow>());
    add(Overflow, enum_keyword::<v::Overflow>());
    add(ZIndex, one_of(vec![integer(), auto()]));
    add(Clip, one_of(vec![crate::grammar::rect(), auto()]));
    add(Direction, enum_keyword::<v::Direction>());
    add(UnicodeBidi, enum_keyword::<v::UnicodeBidi>());
    add(
        VerticalAlign,
        one_of(vec![
            enum_keyword::<v::VerticalAlignKeyword>(),
            length_or_percent(),
        ]),
    );
    add(Opacity, number());

    // ── text and fonts ─────────────────────────────────────────────────
    add(Color, color());
    add(TextAlign, enum_keyword::<v::TextAlign>());
    add(TextTransform, enum_keyword::<v::TextTransform>());
    add(TextIndent, length_or_percent());
    add(
        TextDecoration,
        one_of(vec![
            keyword("none"),
            one_or_more(keyword_in(&["underline", "overline", "line-through", "blink"])),
        ]),
    );
    add(WhiteSpace, enum_keyword::<v::WhiteSpace>());
    add(LetterSpacing, one_of(vec![keyword("normal"), length()]));
    add(WordSpacing, one_of(vec![keyword("normal"), length()]));
    add(LineHeight, line_height_value());
    add(
        FontFamily,
        comma_list(one_of(vec![string_value(), ident_sequence()])),
    );
    add(FontSize, font_size_value());
    add(FontStyle, enum_keyword::<v::FontStyle>());
    add(FontVariant, enum_keyword::<v::FontVariant>());
    add(
        FontWeight,
        one_of(vec![
            keyword_in(&["normal", "bold", "bolder", "lighter"]),
            number(),
        ]),
    );
    add(
        Font,
        one_of(vec![
            // System fonts resolve in the host; keep the keyword.
            keyword_in(&[
                "caption",
                "icon",
                "menu",
                "message-box",
                "small-caption",
                "status-bar",
            ]),
            sequence(vec![
                optional(any_order(vec![
                    sub_property(FontStyle),
                    sub_property(FontVariant),
                    sub_property(FontWeight),
                ])),
                sub_property(FontSize),
                optional(sequence(vec![slash(), sub_property(LineHeight)])),
                sub_property(FontFamily),
            ]),
        ]),
    );
    add(
        TextShadow,
        one_of(vec![keyword("none"), comma_list(shadow())]),
    );
    add(
        BoxShadow,
        one_of(vec![keyword("none"), comma_list(shadow())]),
    );

    // ── lists, tables, generated content ───────────────────────────────
    add(ListStyleType, enum_keyword::<v::ListStyleType>());
    add(ListStylePosition, enum_keyword::<v::ListStylePosition>());
    add(ListStyleImage, one_of(vec![uri(), keyword("none")]));
    add(
        ListStyle,
        any_order(vec![
            enum_keyword::<v::ListStyleType>(),
            enum_keyword::<v::ListStylePosition>(),
            one_of(vec![uri(), keyword("none")]),
        ]),
    );
    add(CaptionSide, enum_keyword::<v::CaptionSide>());
    add(EmptyCells, enum_keyword::<v::EmptyCells>());
    add(TableLayout, enum_keyword::<v::TableLayout>());
    add(
        Content,
        one_of(vec![
            keyword("normal"),
            keyword("none"),
            one_or_more(one_of(vec![
                string_value(),
                uri(),
                counter(),
                counters(),
                attr_fn(),
                keyword_in(&["open-quote", "close-quote", "no-open-quote", "no-close-quote"]),
            ])),
        ]),
    );
    add(
        Quotes,
        one_of(vec![
            keyword("none"),
            one_or_more(sequence(vec![string_value(), string_value()])),
        ]),
    );
    add(CounterIncrement, counter_list());
    add(CounterReset, counter_list());
    add(
        Cursor,
        sequence(vec![
            crate::grammar::zero_or_more(sequence(vec![uri(), comma_marker()])),
            enum_keyword::<v::Cursor>(),
        ]),
    );

    // ── outline ────────────────────────────────────────────────────────
    add(OutlineColor, one_of(vec![color(), keyword("invert")]));
    add(OutlineStyle, enum_keyword::<v::BorderStyle>());
    add(OutlineWidth, border_width());
    add(OutlineOffset, length());
    add(
        Outline,
        any_order(vec![
            one_of(vec![color(), keyword("invert")]),
            enum_keyword::<v::BorderStyle>(),
            border_width(),
        ]),
    );

    // ── paged media ────────────────────────────────────────────────────
    add(PageBreakBefore, enum_keyword::<v::PageBreak>());
    add(PageBreakAfter, enum_keyword::<v::PageBreak>());
    add(PageBreakInside, keyword_in(&["auto", "avoid"]));
    add(Widows, integer());
    add(Orphans, integer());

    // ── flex ───────────────────────────────────────────────────────────
    add(FlexGrow, number());
    add(FlexShrink, number());
    add(FlexBasis, measure_or_auto());
    add(FlexDirection, enum_keyword::<v::FlexDirection>());
    add(FlexWrap, enum_keyword::<v::FlexWrap>());
    add(
        FlexFlow,
        any_order(vec![
            enum_keyword::<v::FlexDirection>(),
            enum_keyword::<v::FlexWrap>(),
        ]),
    );
    add(
        Flex,
        one_of(vec![
            keyword("none"),
            any_order(vec![
                sequence(vec![number(), optional(number())]),
                measure_or_auto(),
            ]),
        ]),
    );
    add(Order, integer());
    add(JustifyContent, enum_keyword::<v::JustifyContent>());
    add(AlignItems, enum_keyword::<v::AlignItems>());
    add(AlignContent, enum_keyword::<v::AlignContent>());
    add(AlignSelf, enum_keyword::<v::AlignSelf>());

    table
});

/// A comma that separates cursor fallback images; recorded so the finish
/// step can split the list.
fn comma_marker() -> Matcher {
    Matcher::new(|lexer, out| {
        let token = lexer.next_non_space();
        if matches!(token.kind, crate::tokenizer::TokenKind::Comma) {
            out.push(crate::grammar::Component::Comma);
            true
        } else {
            false
        }
    })
}

/// The grammar for `id`, if it is a known property.
#[must_use]
pub fn property_grammar(id: PropertyId) -> Option<Matcher> {
    GRAMMARS.get(&id).cloned()
}
