//! Shorthand decomposition.
//!
//! The cascade never compares shorthands directly: every property is
//! decomposed into longhands first, so `margin` competes with
//! `margin-left` on equal terms. Omitted shorthand parts reset their
//! longhand to its initial value, expressed here as an `initial`-flagged
//! longhand.

use std::str::FromStr;

use crate::grammar::{Component, measures, split_commas};
use crate::value as v;
use crate::value::Measure;

use super::{PropertyFlags, PropertyId, PropertyValue, StyleProperty};

pub(super) fn decompose(property: &StyleProperty) -> Vec<StyleProperty> {
    let id = property.id;
    if !id.is_shorthand() || !property.flags.valid {
        return vec![property.clone()];
    }

    // A CSS-wide keyword on a shorthand flags every longhand.
    if property.flags.inherit || property.flags.initial || property.flags.unset {
        return id
            .sub_properties()
            .iter()
            .map(|&sub| StyleProperty {
                id: sub,
                value: PropertyValue::None,
                flags: property.flags,
            })
            .collect();
    }

    let flags = PropertyFlags {
        important: property.flags.important,
        ..PropertyFlags::default()
    };
    let c = property.components();

    use PropertyId::*;
    match id {
        Margin | Padding | BorderWidth | BorderStyle | BorderColor => expand_four(id, c, flags),
        BorderTop | BorderRight | BorderBottom | BorderLeft => border_side(id, c, flags),
        Border => border_all(c, flags),
        BorderRadius => border_radius(c, flags),
        Background => background(c, flags),
        Font => font(c, flags),
        ListStyle => list_style(c, flags),
        Flex => flex(c, flags),
        FlexFlow => flex_flow(c, flags),
        Outline => outline(c, flags),
        Overflow => overflow(c, flags),
        _ => vec![property.clone()],
    }
}

fn parsed(id: PropertyId, components: Vec<Component>, flags: PropertyFlags) -> StyleProperty {
    StyleProperty {
        id,
        value: PropertyValue::Parsed(components),
        flags,
    }
}

/// An omitted shorthand part: the longhand resets to its initial value.
fn initial(id: PropertyId, flags: PropertyFlags) -> StyleProperty {
    StyleProperty {
        id,
        value: PropertyValue::None,
        flags: PropertyFlags {
            initial: true,
            ..flags
        },
    }
}

/// The 1-4 value convention shared by the side shorthands and
/// border-radius: `[all]`, `[a b]`, `[a b c]`, `[a b c d]`.
fn expansion_indices(count: usize) -> Option<[usize; 4]> {
    match count {
        1 => Some([0, 0, 0, 0]),
        2 => Some([0, 1, 0, 1]),
        3 => Some([0, 1, 2, 1]),
        4 => Some([0, 1, 2, 3]),
        _ => None,
    }
}

fn expand_four(id: PropertyId, c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    let Some(indices) = expansion_indices(c.len()) else {
        return Vec::new();
    };
    id.sub_properties()
        .iter()
        .zip(indices)
        .map(|(&sub, index)| parsed(sub, vec![c[index].clone()], flags))
        .collect()
}

/// Classify one component of a border-like shorthand.
enum SidePart {
    Width,
    Style,
    Color,
}

fn classify_side_part(component: &Component) -> Option<SidePart> {
    match component {
        Component::Measure(_) => Some(SidePart::Width),
        Component::Color(_) => Some(SidePart::Color),
        Component::Keyword(word) => match word.as_str() {
            "thin" | "medium" | "thick" => Some(SidePart::Width),
            "invert" => Some(SidePart::Color),
            _ => v::BorderStyle::from_str(word).ok().map(|_| SidePart::Style),
        },
        _ => None,
    }
}

fn split_side_parts(
    c: &[Component],
) -> (Option<Component>, Option<Component>, Option<Component>) {
    let mut width = None;
    let mut line_style = None;
    let mut color = None;
    for component in c {
        match classify_side_part(component) {
            Some(SidePart::Width) => width = Some(component.clone()),
            Some(SidePart::Style) => line_style = Some(component.clone()),
            Some(SidePart::Color) => color = Some(component.clone()),
            None => {}
        }
    }
    (width, line_style, color)
}

fn border_side(id: PropertyId, c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    let (width, line_style, color) = split_side_parts(c);
    let subs = id.sub_properties();
    [width, line_style, color]
        .into_iter()
        .zip(subs)
        .map(|(part, &sub)| match part {
            Some(component) => parsed(sub, vec![component], flags),
            None => initial(sub, flags),
        })
        .collect()
}

fn border_all(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    let (width, line_style, color) = split_side_parts(c);
    let mut longhands = Vec::with_capacity(12);
    let groups: [(&Option<Component>, [PropertyId; 4]); 3] = [
        (
            &width,
            [
                BorderTopWidth,
                BorderRightWidth,
                BorderBottomWidth,
                BorderLeftWidth,
            ],
        ),
        (
            &line_style,
            [
                BorderTopStyle,
                BorderRightStyle,
                BorderBottomStyle,
                BorderLeftStyle,
            ],
        ),
        (
            &color,
            [
                BorderTopColor,
                BorderRightColor,
                BorderBottomColor,
                BorderLeftColor,
            ],
        ),
    ];
    for (part, subs) in groups {
        for sub in subs {
            match part {
                Some(component) => longhands.push(parsed(sub, vec![component.clone()], flags)),
                None => longhands.push(initial(sub, flags)),
            }
        }
    }
    longhands
}

fn border_radius(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    let slash = c.iter().position(|p| matches!(p, Component::Slash));
    let (horizontal_part, vertical_part) = match slash {
        Some(index) => (&c[..index], &c[index + 1..]),
        None => (c, c),
    };
    let horizontal = measures(horizontal_part);
    let vertical = measures(vertical_part);
    let (Some(h_index), Some(v_index)) = (
        expansion_indices(horizontal.len()),
        expansion_indices(vertical.len()),
    ) else {
        return Vec::new();
    };
    PropertyId::BorderRadius
        .sub_properties()
        .iter()
        .enumerate()
        .map(|(corner, &sub)| {
            parsed(
                sub,
                vec![
                    Component::Measure(horizontal[h_index[corner]]),
                    Component::Measure(vertical[v_index[corner]]),
                ],
                flags,
            )
        })
        .collect()
}

fn background(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    // Only the first comma-separated layer contributes to the computed
    // single-layer background.
    let layers = split_commas(c);
    let layer = layers.first().copied().unwrap_or(&[]);

    let mut color = None;
    let mut image = None;
    let mut repeat = None;
    let mut attachment = None;
    let mut position: Vec<Component> = Vec::new();
    let mut size: Vec<Component> = Vec::new();
    let mut after_slash = false;

    for component in layer {
        match component {
            Component::Color(_) => color = Some(component.clone()),
            Component::Uri(_) => image = Some(component.clone()),
            Component::Slash => after_slash = true,
            Component::Measure(_) => {
                if after_slash {
                    size.push(component.clone());
                } else {
                    position.push(component.clone());
                }
            }
            Component::Keyword(word) => match word.as_str() {
                "none" => image = Some(component.clone()),
                "cover" | "contain" => size.push(component.clone()),
                "scroll" | "fixed" => attachment = Some(component.clone()),
                _ => {
                    if v::BackgroundRepeat::from_str(word).is_ok() {
                        repeat = Some(component.clone());
                    }
                }
            },
            _ => {}
        }
    }

    let mut longhands = Vec::with_capacity(6);
    longhands.push(match color {
        Some(component) => parsed(BackgroundColor, vec![component], flags),
        None => initial(BackgroundColor, flags),
    });
    longhands.push(match image {
        Some(component) => parsed(BackgroundImage, vec![component], flags),
        None => initial(BackgroundImage, flags),
    });
    longhands.push(match repeat {
        Some(component) => parsed(BackgroundRepeat, vec![component], flags),
        None => initial(BackgroundRepeat, flags),
    });
    longhands.push(match attachment {
        Some(component) => parsed(BackgroundAttachment, vec![component], flags),
        None => initial(BackgroundAttachment, flags),
    });
    longhands.push(if position.len() == 2 {
        parsed(BackgroundPosition, position, flags)
    } else {
        initial(BackgroundPosition, flags)
    });
    longhands.push(if size.is_empty() {
        initial(BackgroundSize, flags)
    } else {
        parsed(BackgroundSize, size, flags)
    });
    longhands
}

fn font(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    let subs = [FontStyle, FontVariant, FontWeight, FontSize, LineHeight, FontFamily];

    // System font keywords resolve host-side; every longhand resets.
    if matches!(c, [Component::Keyword(_)]) {
        return subs.iter().map(|&sub| initial(sub, flags)).collect();
    }

    subs.iter()
        .map(|&sub| {
            let inner = c.iter().find_map(|component| match component {
                Component::Sub(id, inner) if *id == sub => Some(inner.clone()),
                _ => None,
            });
            match inner {
                Some(inner) => parsed(sub, inner, flags),
                None => initial(sub, flags),
            }
        })
        .collect()
}

fn list_style(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    let mut marker_type = None;
    let mut position = None;
    let mut image = None;
    let mut none_count = 0;

    for component in c {
        match component {
            Component::Uri(_) => image = Some(component.clone()),
            Component::Keyword(word) => {
                if word == "none" {
                    none_count += 1;
                } else if v::ListStylePosition::from_str(word).is_ok() {
                    position = Some(component.clone());
                } else if v::ListStyleType::from_str(word).is_ok() {
                    marker_type = Some(component.clone());
                }
            }
            _ => {}
        }
    }
    // `none` fills whichever of type/image was not given explicitly.
    if none_count > 0 {
        let none = Component::Keyword("none".to_string());
        if marker_type.is_none() {
            marker_type = Some(none.clone());
        }
        if image.is_none() {
            image = Some(none);
        }
    }

    [
        (ListStyleType, marker_type),
        (ListStylePosition, position),
        (ListStyleImage, image),
    ]
    .into_iter()
    .map(|(sub, part)| match part {
        Some(component) => parsed(sub, vec![component], flags),
        None => initial(sub, flags),
    })
    .collect()
}

fn flex(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    if matches!(c, [Component::Keyword(word)] if word == "none") {
        return vec![
            parsed(FlexGrow, vec![Component::Number(0.0)], flags),
            parsed(FlexShrink, vec![Component::Number(0.0)], flags),
            parsed(FlexBasis, vec![Component::Measure(Measure::auto())], flags),
        ];
    }
    let numbers: Vec<f64> = c
        .iter()
        .filter_map(|component| match component {
            Component::Number(value) => Some(*value),
            _ => None,
        })
        .collect();
    let basis = c.iter().find_map(|component| match component {
        Component::Measure(measure) => Some(*measure),
        _ => None,
    });
    // One-value forms: `flex: 2` is `2 1 0%`, `flex: 10em` is `1 1 10em`.
    let grow = numbers.first().copied().unwrap_or(1.0);
    let shrink = numbers.get(1).copied().unwrap_or(1.0);
    let basis = basis.unwrap_or(Measure::percent(0.0));
    vec![
        parsed(FlexGrow, vec![Component::Number(grow)], flags),
        parsed(FlexShrink, vec![Component::Number(shrink)], flags),
        parsed(FlexBasis, vec![Component::Measure(basis)], flags),
    ]
}

fn flex_flow(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    let mut direction = None;
    let mut wrap = None;
    for component in c {
        if let Component::Keyword(word) = component {
            if v::FlexDirection::from_str(word).is_ok() {
                direction = Some(component.clone());
            } else if v::FlexWrap::from_str(word).is_ok() {
                wrap = Some(component.clone());
            }
        }
    }
    [(FlexDirection, direction), (FlexWrap, wrap)]
        .into_iter()
        .map(|(sub, part)| match part {
            Some(component) => parsed(sub, vec![component], flags),
            None => initial(sub, flags),
        })
        .collect()
}

fn outline(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    let (width, line_style, color) = split_side_parts(c);
    use PropertyId::*;
    [
        (OutlineWidth, width),
        (OutlineStyle, line_style),
        (OutlineColor, color),
    ]
    .into_iter()
    .map(|(sub, part)| match part {
        Some(component) => parsed(sub, vec![component], flags),
        None => initial(sub, flags),
    })
    .collect()
}

fn overflow(c: &[Component], flags: PropertyFlags) -> Vec<StyleProperty> {
    use PropertyId::*;
    vec![
        parsed(OverflowX, c.to_vec(), flags),
        parsed(OverflowY, c.to_vec(), flags),
    ]
}
