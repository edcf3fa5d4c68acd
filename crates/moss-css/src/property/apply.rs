//! Applying parsed properties to a computed style.
//!
//! `apply` interprets a longhand's components and writes the target field
//! through the style's copy-on-write mutators; `copy_property` imports a
//! field from another style (the parent for `inherit`, the default for
//! `initial`). Both are identity for unknown and invalid properties.

use std::str::FromStr;

use crate::grammar::{Component, first_color, first_keyword, first_measure, measures, split_commas};
use crate::style::{BackgroundSize, ComputedStyle, ContentItem, CursorValue, Shadow};
use crate::value as v;
use crate::value::{Color, FontWeight, Measure, Unit};

use super::{PropertyId, PropertyValue, StyleProperty};

/// Border widths for `thin` / `medium` / `thick`.
const THIN: f64 = 1.0;
const MEDIUM: f64 = 3.0;
const THICK: f64 = 5.0;

pub(super) fn apply(property: &StyleProperty, style: &ComputedStyle) -> ComputedStyle {
    if !property.flags.valid {
        return style.clone();
    }
    let components = match &property.value {
        PropertyValue::Parsed(components) => components.as_slice(),
        // Flag-only and preserved-token properties never touch the style
        // here; the cascade handles the flags.
        _ => return style.clone(),
    };
    if property.id.is_shorthand() {
        return property
            .decompose()
            .iter()
            .fold(style.clone(), |style, longhand| longhand.apply(&style));
    }
    apply_longhand(property.id, components, style)
}

fn apply_longhand(id: PropertyId, c: &[Component], style: &ComputedStyle) -> ComputedStyle {
    use PropertyId::*;
    match id {
        // ── background ────────────────────────────────────────────────
        BackgroundAttachment => match kw::<v::BackgroundAttachment>(c) {
            Some(value) => style.with_background(|b| b.attachment = value),
            None => style.clone(),
        },
        BackgroundColor => match first_color(c) {
            Some(color) => style.with_background(|b| b.color = color),
            None => style.clone(),
        },
        BackgroundImage => style.with_background(|b| b.image = uri_or_none(c)),
        BackgroundPosition => {
            let m = measures(c);
            match m.as_slice() {
                [x, y] => style.with_background(|b| {
                    b.position_x = *x;
                    b.position_y = *y;
                }),
                _ => style.clone(),
            }
        }
        BackgroundRepeat => match kw::<v::BackgroundRepeat>(c) {
            Some(value) => style.with_background(|b| b.repeat = value),
            None => style.clone(),
        },
        BackgroundSize => style.with_background(|b| b.size = background_size(c)),

        // ── borders ───────────────────────────────────────────────────
        BorderCollapse => match kw::<v::BorderCollapse>(c) {
            Some(value) => style.with_inherited(|i| i.border_collapse = value),
            None => style.clone(),
        },
        BorderSpacing => {
            let m = measures(c);
            let (h, v) = match m.as_slice() {
                [h] => (*h, *h),
                [h, v] => (*h, *v),
                _ => return style.clone(),
            };
            style.with_inherited(|i| i.border_spacing = (h, v))
        }
        BorderTopColor => border_color(style, c, |b| &mut b.top.color),
        BorderRightColor => border_color(style, c, |b| &mut b.right.color),
        BorderBottomColor => border_color(style, c, |b| &mut b.bottom.color),
        BorderLeftColor => border_color(style, c, |b| &mut b.left.color),
        BorderTopStyle => border_style(style, c, |b| &mut b.top.style),
        BorderRightStyle => border_style(style, c, |b| &mut b.right.style),
        BorderBottomStyle => border_style(style, c, |b| &mut b.bottom.style),
        BorderLeftStyle => border_style(style, c, |b| &mut b.left.style),
        BorderTopWidth => border_width_apply(style, c, |b| &mut b.top.width),
        BorderRightWidth => border_width_apply(style, c, |b| &mut b.right.width),
        BorderBottomWidth => border_width_apply(style, c, |b| &mut b.bottom.width),
        BorderLeftWidth => border_width_apply(style, c, |b| &mut b.left.width),
        BorderTopLeftRadius => corner_radius(style, c, |b| &mut b.radius.top_left),
        BorderTopRightRadius => corner_radius(style, c, |b| &mut b.radius.top_right),
        BorderBottomRightRadius => corner_radius(style, c, |b| &mut b.radius.bottom_right),
        BorderBottomLeftRadius => corner_radius(style, c, |b| &mut b.radius.bottom_left),

        // ── box model ─────────────────────────────────────────────────
        Width => measure_apply(style, c, |s| &mut s.width),
        Height => measure_apply(style, c, |s| &mut s.height),
        MinWidth => measure_apply(style, c, |s| &mut s.min_width),
        MinHeight => measure_apply(style, c, |s| &mut s.min_height),
        MaxWidth => style.with_sizes(|s| s.max_width = measure_or_none(c)),
        MaxHeight => style.with_sizes(|s| s.max_height = measure_or_none(c)),
        MarginTop => measure_apply(style, c, |s| &mut s.margin.top),
        MarginRight => measure_apply(style, c, |s| &mut s.margin.right),
        MarginBottom => measure_apply(style, c, |s| &mut s.margin.bottom),
        MarginLeft => measure_apply(style, c, |s| &mut s.margin.left),
        PaddingTop => measure_apply(style, c, |s| &mut s.padding.top),
        PaddingRight => measure_apply(style, c, |s| &mut s.padding.right),
        PaddingBottom => measure_apply(style, c, |s| &mut s.padding.bottom),
        PaddingLeft => measure_apply(style, c, |s| &mut s.padding.left),
        Top => measure_apply(style, c, |s| &mut s.top),
        Right => measure_apply(style, c, |s| &mut s.right),
        Bottom => measure_apply(style, c, |s| &mut s.bottom),
        Left => measure_apply(style, c, |s| &mut s.left),
        BoxSizing => match kw::<v::BoxSizing>(c) {
            Some(value) => style.with_enums(|e| e.box_sizing = value),
            None => style.clone(),
        },

        // ── positioning and flow ──────────────────────────────────────
        Display => match kw::<v::Display>(c) {
            Some(value) => style.with_enums(|e| e.display = value),
            None => style.clone(),
        },
        Position => match kw::<v::Position>(c) {
            Some(value) => style.with_enums(|e| e.position = value),
            None => style.clone(),
        },
        Float => match kw::<v::Float>(c) {
            Some(value) => style.with_enums(|e| e.float = value),
            None => style.clone(),
        },
        Clear => match kw::<v::Clear>(c) {
            Some(value) => style.with_enums(|e| e.clear = value),
            None => style.clone(),
        },
        Visibility => match kw::<v::Visibility>(c) {
            Some(value) => style.with_inherited(|i| i.visibility = value),
            None => style.clone(),
        },
        OverflowX => match kw::<v::Overflow>(c) {
            Some(value) => style.with_enums(|e| e.overflow_x = value),
            None => style.clone(),
        },
        OverflowY => match kw::<v::Overflow>(c) {
            Some(value) => style.with_enums(|e| e.overflow_y = value),
            None => style.clone(),
        },
        ZIndex => {
            let value = c.iter().find_map(|component| match component {
                Component::Integer(value) => Some(*value),
                // `auto` computes to stack level 0 in this model.
                Component::Measure(m) if m.is_auto() => Some(0),
                _ => None,
            });
            match value {
                Some(value) => style.with_enums(|e| e.z_index = value),
                None => style.clone(),
            }
        }
        Clip => {
            let clip = c.iter().find_map(|component| match component {
                Component::Rect(sides) => Some(Some(*sides)),
                Component::Measure(m) if m.is_auto() => Some(None),
                _ => None,
            });
            match clip {
                Some(clip) => style.with_rare(|r| r.clip = clip),
                None => style.clone(),
            }
        }
        Direction => match kw::<v::Direction>(c) {
            Some(value) => style.with_inherited(|i| i.direction = value),
            None => style.clone(),
        },
        UnicodeBidi => match kw::<v::UnicodeBidi>(c) {
            Some(value) => style.with_enums(|e| e.unicode_bidi = value),
            None => style.clone(),
        },
        VerticalAlign => {
            let value = match first_keyword(c) {
                Some(word) => v::VerticalAlignKeyword::from_str(word)
                    .ok()
                    .map(crate::style::VerticalAlign::Keyword),
                None => first_measure(c).map(crate::style::VerticalAlign::Length),
            };
            match value {
                Some(value) => style.with_sizes(|s| s.vertical_align = value),
                None => style.clone(),
            }
        }
        Opacity => match first_number(c) {
            Some(value) => style.with_rare(|r| r.opacity = value.clamp(0.0, 1.0)),
            None => style.clone(),
        },

        // ── text and fonts ────────────────────────────────────────────
        Color => match first_color(c) {
            Some(color) => style.with_inherited(|i| i.color = color),
            None => style.clone(),
        },
        TextAlign => match kw::<v::TextAlign>(c) {
            Some(value) => style.with_inherited(|i| i.text_align = value),
            None => style.clone(),
        },
        TextTransform => match kw::<v::TextTransform>(c) {
            Some(value) => style.with_inherited(|i| i.text_transform = value),
            None => style.clone(),
        },
        TextIndent => match first_measure(c) {
            Some(measure) => style.with_inherited(|i| i.text_indent = measure),
            None => style.clone(),
        },
        TextDecoration => {
            let mut decoration = v::TextDecoration::NONE;
            for component in c {
                if let Component::Keyword(word) = component {
                    let _ = decoration.set_keyword(word);
                }
            }
            style.with_rare(|r| r.text_decoration = decoration)
        }
        WhiteSpace => match kw::<v::WhiteSpace>(c) {
            Some(value) => style.with_inherited(|i| i.white_space = value),
            None => style.clone(),
        },
        LetterSpacing => style.with_inherited(|i| i.letter_spacing = normal_or_measure(c)),
        WordSpacing => style.with_inherited(|i| i.word_spacing = normal_or_measure(c)),
        LineHeight => {
            let value = line_height(c, style);
            style.with_inherited(|i| i.line_height = value)
        }
        FontFamily => {
            let families = font_families(c);
            if families.is_empty() {
                style.clone()
            } else {
                style.with_inherited(|i| i.font_family = families)
            }
        }
        FontSize => match font_size(c, style) {
            Some(size) => style.with_inherited(|i| i.font_size = size),
            None => style.clone(),
        },
        FontStyle => match kw::<v::FontStyle>(c) {
            Some(value) => style.with_inherited(|i| i.font_style = value),
            None => style.clone(),
        },
        FontVariant => match kw::<v::FontVariant>(c) {
            Some(value) => style.with_inherited(|i| i.font_variant = value),
            None => style.clone(),
        },
        FontWeight => match font_weight(c) {
            Some(value) => style.with_inherited(|i| i.font_weight = value),
            None => style.clone(),
        },
        TextShadow => style.with_rare(|r| r.text_shadow = shadows(c)),
        BoxShadow => style.with_rare(|r| r.box_shadow = shadows(c)),

        // ── lists, tables, generated content ──────────────────────────
        ListStyleType => match kw::<v::ListStyleType>(c) {
            Some(value) => style.with_inherited(|i| i.list_style_type = value),
            None => style.clone(),
        },
        ListStylePosition => match kw::<v::ListStylePosition>(c) {
            Some(value) => style.with_inherited(|i| i.list_style_position = value),
            None => style.clone(),
        },
        ListStyleImage => style.with_inherited(|i| i.list_style_image = uri_or_none(c)),
        CaptionSide => match kw::<v::CaptionSide>(c) {
            Some(value) => style.with_inherited(|i| i.caption_side = value),
            None => style.clone(),
        },
        EmptyCells => match kw::<v::EmptyCells>(c) {
            Some(value) => style.with_inherited(|i| i.empty_cells = value),
            None => style.clone(),
        },
        TableLayout => match kw::<v::TableLayout>(c) {
            Some(value) => style.with_enums(|e| e.table_layout = value),
            None => style.clone(),
        },
        Content => style.with_rare(|r| r.content = content_items(c)),
        Quotes => {
            let value = quotes_value(c);
            style.with_inherited(|i| i.quotes = value)
        }
        CounterIncrement => {
            let counters = counter_pairs(c, 1);
            style.with_rare(|r| r.counter_increment = counters)
        }
        CounterReset => {
            let counters = counter_pairs(c, 0);
            style.with_rare(|r| r.counter_reset = counters)
        }
        Cursor => {
            let value = cursor_value(c);
            style.with_inherited(|i| i.cursor = value)
        }

        // ── outline ───────────────────────────────────────────────────
        OutlineColor => {
            // `invert` is approximated by the initial color.
            let color = first_color(c).unwrap_or(v::Color::BLACK);
            style.with_border(|b| b.outline.color = color)
        }
        OutlineStyle => match kw::<v::BorderStyle>(c) {
            Some(value) => style.with_border(|b| b.outline.style = value),
            None => style.clone(),
        },
        OutlineWidth => match width_measure(c) {
            Some(width) => style.with_border(|b| b.outline.width = width),
            None => style.clone(),
        },
        OutlineOffset => match first_measure(c) {
            Some(offset) => style.with_border(|b| b.outline.offset = offset),
            None => style.clone(),
        },

        // ── paged media ───────────────────────────────────────────────
        PageBreakBefore => match kw::<v::PageBreak>(c) {
            Some(value) => style.with_rare(|r| r.page_break_before = value),
            None => style.clone(),
        },
        PageBreakAfter => match kw::<v::PageBreak>(c) {
            Some(value) => style.with_rare(|r| r.page_break_after = value),
            None => style.clone(),
        },
        PageBreakInside => match kw::<v::PageBreak>(c) {
            Some(value) => style.with_rare(|r| r.page_break_inside = value),
            None => style.clone(),
        },
        Widows => match first_integer(c) {
            Some(value) => style.with_inherited(|i| i.widows = value),
            None => style.clone(),
        },
        Orphans => match first_integer(c) {
            Some(value) => style.with_inherited(|i| i.orphans = value),
            None => style.clone(),
        },

        // ── flex ──────────────────────────────────────────────────────
        FlexGrow => match first_number(c) {
            Some(value) => style.with_rare(|r| r.flex_grow = value.max(0.0)),
            None => style.clone(),
        },
        FlexShrink => match first_number(c) {
            Some(value) => style.with_rare(|r| r.flex_shrink = value.max(0.0)),
            None => style.clone(),
        },
        FlexBasis => match first_measure(c) {
            Some(measure) => style.with_rare(|r| r.flex_basis = measure),
            None => style.clone(),
        },
        FlexDirection => match kw::<v::FlexDirection>(c) {
            Some(value) => style.with_rare(|r| r.flex_direction = value),
            None => style.clone(),
        },
        FlexWrap => match kw::<v::FlexWrap>(c) {
            Some(value) => style.with_rare(|r| r.flex_wrap = value),
            None => style.clone(),
        },
        Order => match first_integer(c) {
            Some(value) => style.with_rare(|r| r.order = value),
            None => style.clone(),
        },
        JustifyContent => match kw::<v::JustifyContent>(c) {
            Some(value) => style.with_rare(|r| r.justify_content = value),
            None => style.clone(),
        },
        AlignItems => match kw::<v::AlignItems>(c) {
            Some(value) => style.with_rare(|r| r.align_items = value),
            None => style.clone(),
        },
        AlignContent => match kw::<v::AlignContent>(c) {
            Some(value) => style.with_rare(|r| r.align_content = value),
            None => style.clone(),
        },
        AlignSelf => match kw::<v::AlignSelf>(c) {
            Some(value) => style.with_rare(|r| r.align_self = value),
            None => style.clone(),
        },

        // Shorthands are decomposed in `apply`; anything else is inert.
        _ => style.clone(),
    }
}

/// Copy the field(s) of `id` from `source` into `dest`.
pub(super) fn copy_property(
    id: PropertyId,
    dest: &ComputedStyle,
    source: &ComputedStyle,
) -> ComputedStyle {
    use PropertyId::*;
    if id.is_shorthand() {
        return id
            .sub_properties()
            .iter()
            .fold(dest.clone(), |style, &sub| {
                copy_property(sub, &style, source)
            });
    }
    match id {
        BackgroundAttachment => dest.with_background(|b| b.attachment = source.background().attachment),
        BackgroundColor => dest.with_background(|b| b.color = source.background().color),
        BackgroundImage => dest.with_background(|b| b.image = source.background().image.clone()),
        BackgroundPosition => dest.with_background(|b| {
            b.position_x = source.background().position_x;
            b.position_y = source.background().position_y;
        }),
        BackgroundRepeat => dest.with_background(|b| b.repeat = source.background().repeat),
        BackgroundSize => dest.with_background(|b| b.size = source.background().size),

        BorderCollapse => dest.with_inherited(|i| i.border_collapse = source.inherited().border_collapse),
        BorderSpacing => dest.with_inherited(|i| i.border_spacing = source.inherited().border_spacing),
        BorderTopColor => dest.with_border(|b| b.top.color = source.border().top.color),
        BorderRightColor => dest.with_border(|b| b.right.color = source.border().right.color),
        BorderBottomColor => dest.with_border(|b| b.bottom.color = source.border().bottom.color),
        BorderLeftColor => dest.with_border(|b| b.left.color = source.border().left.color),
        BorderTopStyle => dest.with_border(|b| b.top.style = source.border().top.style),
        BorderRightStyle => dest.with_border(|b| b.right.style = source.border().right.style),
        BorderBottomStyle => dest.with_border(|b| b.bottom.style = source.border().bottom.style),
        BorderLeftStyle => dest.with_border(|b| b.left.style = source.border().left.style),
        BorderTopWidth => dest.with_border(|b| b.top.width = source.border().top.width),
        BorderRightWidth => dest.with_border(|b| b.right.width = source.border().right.width),
        BorderBottomWidth => dest.with_border(|b| b.bottom.width = source.border().bottom.width),
        BorderLeftWidth => dest.with_border(|b| b.left.width = source.border().left.width),
        BorderTopLeftRadius => dest.with_border(|b| b.radius.top_left = source.border().radius.top_left),
        BorderTopRightRadius => dest.with_border(|b| b.radius.top_right = source.border().radius.top_right),
        BorderBottomRightRadius => {
            dest.with_border(|b| b.radius.bottom_right = source.border().radius.bottom_right)
        }
        BorderBottomLeftRadius => {
            dest.with_border(|b| b.radius.bottom_left = source.border().radius.bottom_left)
        }

        Width => dest.with_sizes(|s| s.width = source.sizes().width),
        Height => dest.with_sizes(|s| s.height = source.sizes().height),
        MinWidth => dest.with_sizes(|s| s.min_width = source.sizes().min_width),
        MinHeight => dest.with_sizes(|s| s.min_height = source.sizes().min_height),
        MaxWidth => dest.with_sizes(|s| s.max_width = source.sizes().max_width),
        MaxHeight => dest.with_sizes(|s| s.max_height = source.sizes().max_height),
        MarginTop => dest.with_sizes(|s| s.margin.top = source.sizes().margin.top),
        MarginRight => dest.with_sizes(|s| s.margin.right = source.sizes().margin.right),
        MarginBottom => dest.with_sizes(|s| s.margin.bottom = source.sizes().margin.bottom),
        MarginLeft => dest.with_sizes(|s| s.margin.left = source.sizes().margin.left),
        PaddingTop => dest.with_sizes(|s| s.padding.top = source.sizes().padding.top),
        PaddingRight => dest.with_sizes(|s| s.padding.right = source.sizes().padding.right),
        PaddingBottom => dest.with_sizes(|s| s.padding.bottom = source.sizes().padding.bottom),
        PaddingLeft => dest.with_sizes(|s| s.padding.left = source.sizes().padding.left),
        Top => dest.with_sizes(|s| s.top = source.sizes().top),
        Right => dest.with_sizes(|s| s.right = source.sizes().right),
        Bottom => dest.with_sizes(|s| s.bottom = source.sizes().bottom),
        Left => dest.with_sizes(|s| s.left = source.sizes().left),
        VerticalAlign => dest.with_sizes(|s| s.vertical_align = source.sizes().vertical_align),

        BoxSizing => dest.with_enums(|e| e.box_sizing = source.enums().box_sizing),
        Display => dest.with_enums(|e| e.display = source.enums().display),
        Position => dest.with_enums(|e| e.position = source.enums().position),
        Float => dest.with_enums(|e| e.float = source.enums().float),
        Clear => dest.with_enums(|e| e.clear = source.enums().clear),
        OverflowX => dest.with_enums(|e| e.overflow_x = source.enums().overflow_x),
        OverflowY => dest.with_enums(|e| e.overflow_y = source.enums().overflow_y),
        ZIndex => dest.with_enums(|e| e.z_index = source.enums().z_index),
        TableLayout => dest.with_enums(|e| e.table_layout = source.enums().table_layout),
        UnicodeBidi => dest.with_enums(|e| e.unicode_bidi = source.enums().unicode_bidi),

        Visibility => dest.with_inherited(|i| i.visibility = source.inherited().visibility),
        Direction => dest.with_inherited(|i| i.direction = source.inherited().direction),
        Color => dest.with_inherited(|i| i.color = source.inherited().color),
        TextAlign => dest.with_inherited(|i| i.text_align = source.inherited().text_align),
        TextTransform => dest.with_inherited(|i| i.text_transform = source.inherited().text_transform),
        TextIndent => dest.with_inherited(|i| i.text_indent = source.inherited().text_indent),
        WhiteSpace => dest.with_inherited(|i| i.white_space = source.inherited().white_space),
        LetterSpacing => dest.with_inherited(|i| i.letter_spacing = source.inherited().letter_spacing),
        WordSpacing => dest.with_inherited(|i| i.word_spacing = source.inherited().word_spacing),
        LineHeight => dest.with_inherited(|i| i.line_height = source.inherited().line_height),
        FontFamily => dest.with_inherited(|i| i.font_family = source.inherited().font_family.clone()),
        FontSize => dest.with_inherited(|i| i.font_size = source.inherited().font_size),
        FontStyle => dest.with_inherited(|i| i.font_style = source.inherited().font_style),
        FontVariant => dest.with_inherited(|i| i.font_variant = source.inherited().font_variant),
        FontWeight => dest.with_inherited(|i| i.font_weight = source.inherited().font_weight),
        ListStyleType => dest.with_inherited(|i| i.list_style_type = source.inherited().list_style_type),
        ListStylePosition => {
            dest.with_inherited(|i| i.list_style_position = source.inherited().list_style_position)
        }
        ListStyleImage => {
            dest.with_inherited(|i| i.list_style_image = source.inherited().list_style_image.clone())
        }
        CaptionSide => dest.with_inherited(|i| i.caption_side = source.inherited().caption_side),
        EmptyCells => dest.with_inherited(|i| i.empty_cells = source.inherited().empty_cells),
        Quotes => dest.with_inherited(|i| i.quotes = source.inherited().quotes.clone()),
        Cursor => dest.with_inherited(|i| i.cursor = source.inherited().cursor.clone()),
        Widows => dest.with_inherited(|i| i.widows = source.inherited().widows),
        Orphans => dest.with_inherited(|i| i.orphans = source.inherited().orphans),

        OutlineColor => dest.with_border(|b| b.outline.color = source.border().outline.color),
        OutlineStyle => dest.with_border(|b| b.outline.style = source.border().outline.style),
        OutlineWidth => dest.with_border(|b| b.outline.width = source.border().outline.width),
        OutlineOffset => dest.with_border(|b| b.outline.offset = source.border().outline.offset),

        PageBreakBefore => dest.with_rare(|r| r.page_break_before = source.rare().page_break_before),
        PageBreakAfter => dest.with_rare(|r| r.page_break_after = source.rare().page_break_after),
        PageBreakInside => dest.with_rare(|r| r.page_break_inside = source.rare().page_break_inside),
        Content => dest.with_rare(|r| r.content = source.rare().content.clone()),
        CounterIncrement => {
            dest.with_rare(|r| r.counter_increment = source.rare().counter_increment.clone())
        }
        CounterReset => dest.with_rare(|r| r.counter_reset = source.rare().counter_reset.clone()),
        Clip => dest.with_rare(|r| r.clip = source.rare().clip),
        TextDecoration => dest.with_rare(|r| r.text_decoration = source.rare().text_decoration),
        TextShadow => dest.with_rare(|r| r.text_shadow = source.rare().text_shadow.clone()),
        BoxShadow => dest.with_rare(|r| r.box_shadow = source.rare().box_shadow.clone()),
        Opacity => dest.with_rare(|r| r.opacity = source.rare().opacity),
        FlexGrow => dest.with_rare(|r| r.flex_grow = source.rare().flex_grow),
        FlexShrink => dest.with_rare(|r| r.flex_shrink = source.rare().flex_shrink),
        FlexBasis => dest.with_rare(|r| r.flex_basis = source.rare().flex_basis),
        FlexDirection => dest.with_rare(|r| r.flex_direction = source.rare().flex_direction),
        FlexWrap => dest.with_rare(|r| r.flex_wrap = source.rare().flex_wrap),
        Order => dest.with_rare(|r| r.order = source.rare().order),
        JustifyContent => dest.with_rare(|r| r.justify_content = source.rare().justify_content),
        AlignItems => dest.with_rare(|r| r.align_items = source.rare().align_items),
        AlignContent => dest.with_rare(|r| r.align_content = source.rare().align_content),
        AlignSelf => dest.with_rare(|r| r.align_self = source.rare().align_self),

        _ => dest.clone(),
    }
}

// ── interpretation helpers ─────────────────────────────────────────────

fn kw<E: FromStr>(components: &[Component]) -> Option<E> {
    first_keyword(components).and_then(|word| E::from_str(word).ok())
}

fn first_number(components: &[Component]) -> Option<f64> {
    components.iter().find_map(|c| match c {
        Component::Number(value) => Some(*value),
        Component::Integer(value) => Some(f64::from(*value)),
        _ => None,
    })
}

fn first_integer(components: &[Component]) -> Option<i32> {
    components.iter().find_map(|c| match c {
        Component::Integer(value) => Some(*value),
        _ => None,
    })
}

fn uri_or_none(components: &[Component]) -> Option<String> {
    components.iter().find_map(|c| match c {
        Component::Uri(uri) => Some(Some(uri.clone())),
        Component::Keyword(word) if word == "none" => Some(None),
        _ => None,
    })?
}

fn measure_or_none(components: &[Component]) -> Option<Measure> {
    if first_keyword(components) == Some("none") {
        return None;
    }
    first_measure(components)
}

fn normal_or_measure(components: &[Component]) -> Option<Measure> {
    if first_keyword(components) == Some("normal") {
        return None;
    }
    first_measure(components)
}

/// A border/outline width: a length or `thin`/`medium`/`thick`.
pub(super) fn width_measure(components: &[Component]) -> Option<Measure> {
    if let Some(measure) = first_measure(components) {
        return Some(measure);
    }
    match first_keyword(components)? {
        "thin" => Some(Measure::px(THIN)),
        "medium" => Some(Measure::px(MEDIUM)),
        "thick" => Some(Measure::px(THICK)),
        _ => None,
    }
}

fn measure_apply(
    style: &ComputedStyle,
    components: &[Component],
    field: impl FnOnce(&mut crate::style::SizeBag) -> &mut Measure,
) -> ComputedStyle {
    match first_measure(components) {
        Some(measure) => style.with_sizes(|s| *field(s) = measure),
        None => style.clone(),
    }
}

fn border_color(
    style: &ComputedStyle,
    components: &[Component],
    field: impl FnOnce(&mut crate::style::BorderBag) -> &mut Color,
) -> ComputedStyle {
    match first_color(components) {
        Some(color) => style.with_border(|b| *field(b) = color),
        None => style.clone(),
    }
}

fn border_style(
    style: &ComputedStyle,
    components: &[Component],
    field: impl FnOnce(&mut crate::style::BorderBag) -> &mut v::BorderStyle,
) -> ComputedStyle {
    match kw::<v::BorderStyle>(components) {
        Some(value) => style.with_border(|b| *field(b) = value),
        None => style.clone(),
    }
}

fn border_width_apply(
    style: &ComputedStyle,
    components: &[Component],
    field: impl FnOnce(&mut crate::style::BorderBag) -> &mut Measure,
) -> ComputedStyle {
    match width_measure(components) {
        Some(width) => style.with_border(|b| *field(b) = width),
        None => style.clone(),
    }
}

fn corner_radius(
    style: &ComputedStyle,
    components: &[Component],
    field: impl FnOnce(&mut crate::style::BorderBag) -> &mut (Measure, Measure),
) -> ComputedStyle {
    let m = measures(components);
    let pair = match m.as_slice() {
        [h] => (*h, *h),
        [h, v] => (*h, *v),
        _ => return style.clone(),
    };
    style.with_border(|b| *field(b) = pair)
}

fn background_size(components: &[Component]) -> BackgroundSize {
    match first_keyword(components) {
        Some("cover") => return BackgroundSize::Cover,
        Some("contain") => return BackgroundSize::Contain,
        _ => {}
    }
    let m = measures(components);
    match m.as_slice() {
        [w] => BackgroundSize::Explicit(*w, Measure::auto()),
        [w, h] => BackgroundSize::Explicit(*w, *h),
        _ => BackgroundSize::Auto,
    }
}

fn line_height(components: &[Component], style: &ComputedStyle) -> Measure {
    if first_keyword(components) == Some("normal") {
        return crate::style::InheritedBag::default().line_height;
    }
    if let Some(value) = components.iter().find_map(|c| match c {
        Component::Number(value) => Some(*value),
        _ => None,
    }) {
        // Unitless multiplier, kept distinct from lengths.
        return Measure::new(value, Unit::None);
    }
    first_measure(components).unwrap_or(style.inherited().line_height)
}

fn font_families(components: &[Component]) -> Vec<String> {
    split_commas(components)
        .into_iter()
        .filter_map(|group| {
            group.iter().find_map(|c| match c {
                Component::Ident(name) | Component::QuotedString(name) => Some(name.clone()),
                _ => None,
            })
        })
        .collect()
}

/// Keyword sizes scale from the 14px default; `larger`/`smaller` scale
/// the inherited size by the CSS 2.1 factor.
fn font_size(components: &[Component], style: &ComputedStyle) -> Option<Measure> {
    if let Some(measure) = first_measure(components) {
        return Some(measure);
    }
    let inherited = style.inherited().font_size;
    match first_keyword(components)? {
        "xx-small" => Some(Measure::px(9.0)),
        "x-small" => Some(Measure::px(10.0)),
        "small" => Some(Measure::px(12.0)),
        "medium" => Some(Measure::px(14.0)),
        "large" => Some(Measure::px(17.0)),
        "x-large" => Some(Measure::px(20.0)),
        "xx-large" => Some(Measure::px(27.0)),
        "larger" => Some(Measure::new(inherited.value * 1.2, inherited.unit)),
        "smaller" => Some(Measure::new(inherited.value / 1.2, inherited.unit)),
        _ => None,
    }
}

fn font_weight(components: &[Component]) -> Option<FontWeight> {
    if let Some(word) = first_keyword(components) {
        return FontWeight::from_keyword(word);
    }
    first_number(components).and_then(FontWeight::from_number)
}

fn shadows(components: &[Component]) -> Vec<Shadow> {
    if first_keyword(components) == Some("none") {
        return Vec::new();
    }
    split_commas(components)
        .into_iter()
        .filter_map(shadow_from)
        .collect()
}

fn shadow_from(components: &[Component]) -> Option<Shadow> {
    let m = measures(components);
    let (offset_x, offset_y) = match m.as_slice() {
        [x, y, ..] => (*x, *y),
        _ => return None,
    };
    Some(Shadow {
        offset_x,
        offset_y,
        blur: m.get(2).copied().unwrap_or(Measure::zero()),
        spread: m.get(3).copied().unwrap_or(Measure::zero()),
        color: first_color(components),
        inset: components
            .iter()
            .any(|c| matches!(c, Component::Keyword(word) if word == "inset")),
    })
}

fn content_items(components: &[Component]) -> Option<Vec<ContentItem>> {
    match first_keyword(components) {
        Some("normal") | Some("none") => return None,
        _ => {}
    }
    let items: Vec<ContentItem> = components
        .iter()
        .filter_map(|component| match component {
            Component::QuotedString(text) => Some(ContentItem::Text(text.clone())),
            Component::Uri(uri) => Some(ContentItem::Uri(uri.clone())),
            Component::AttrRef(name) => Some(ContentItem::Attr(name.clone())),
            Component::CounterRef {
                name,
                separator,
                style,
            } => {
                let style = style
                    .as_deref()
                    .and_then(|s| v::ListStyleType::from_str(s).ok());
                Some(match separator {
                    Some(separator) => ContentItem::Counters {
                        name: name.clone(),
                        separator: separator.clone(),
                        style,
                    },
                    None => ContentItem::Counter {
                        name: name.clone(),
                        style,
                    },
                })
            }
            Component::Keyword(word) => match word.as_str() {
                "open-quote" => Some(ContentItem::OpenQuote),
                "close-quote" => Some(ContentItem::CloseQuote),
                "no-open-quote" => Some(ContentItem::NoOpenQuote),
                "no-close-quote" => Some(ContentItem::NoCloseQuote),
                _ => None,
            },
            _ => None,
        })
        .collect();
    (!items.is_empty()).then_some(items)
}

/// `none` is an explicit empty pair list; it differs from leaving the
/// user-agent default in place.
fn quotes_value(components: &[Component]) -> Option<Vec<(String, String)>> {
    if first_keyword(components) == Some("none") {
        return Some(Vec::new());
    }
    let strings: Vec<&String> = components
        .iter()
        .filter_map(|c| match c {
            Component::QuotedString(text) => Some(text),
            _ => None,
        })
        .collect();
    let pairs: Vec<(String, String)> = strings
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    (!pairs.is_empty()).then_some(pairs)
}

fn counter_pairs(components: &[Component], default_value: i32) -> Vec<(String, i32)> {
    if first_keyword(components) == Some("none") {
        return Vec::new();
    }
    let mut pairs = Vec::new();
    let mut iter = components.iter().peekable();
    while let Some(component) = iter.next() {
        if let Component::Ident(name) = component {
            let value = match iter.peek() {
                Some(Component::Integer(value)) => {
                    let value = *value;
                    let _ = iter.next();
                    value
                }
                _ => default_value,
            };
            pairs.push((name.clone(), value));
        }
    }
    pairs
}

fn cursor_value(components: &[Component]) -> CursorValue {
    let images = components
        .iter()
        .filter_map(|c| match c {
            Component::Uri(uri) => Some(uri.clone()),
            _ => None,
        })
        .collect();
    let keyword = kw::<v::Cursor>(components).unwrap_or_default();
    CursorValue { images, keyword }
}
