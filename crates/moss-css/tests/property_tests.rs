//! Integration tests for property parsing, shorthand expansion, and
//! application.

use moss_css::style::{BackgroundSize, VerticalAlign};
use moss_css::value::{
    BorderStyle, Color, Cursor, Display, FontWeight, ListStyleType, Measure, Overflow, Unit,
    VerticalAlignKeyword,
};
use moss_css::{ComputedStyle, Messages, PropertyId, StyleManager};
use moss_dom::{DomTree, ElementData, NodeId, NodeKind};

/// Compute the style of a lone `<div>` with `body` as its declaration
/// block.
fn computed(body: &str) -> ComputedStyle {
    computed_with_messages(body, &Messages::new())
}

fn computed_with_messages(body: &str, messages: &Messages) -> ComputedStyle {
    let mut tree = DomTree::new();
    let div = tree.alloc(NodeKind::Element(ElementData::new("div")));
    tree.append_child(NodeId::ROOT, div);

    let mut manager = StyleManager::with_messages(messages.clone());
    let _ = manager.add_stylesheet(&format!("div {{ {body} }}"), "test.css");
    manager.compute_style(&tree, div, None)
}

#[test]
fn test_color_forms() {
    assert_eq!(computed("color: #abc").color(), Color::rgb(0xAA, 0xBB, 0xCC));
    assert_eq!(computed("color: #aabbcc").color(), Color::rgb(0xAA, 0xBB, 0xCC));
    assert_eq!(computed("color: tomato").color(), Color::rgb(0xFF, 0x63, 0x47));
    assert_eq!(
        computed("color: rgb(10, 20, 30)").color(),
        Color::rgb(10, 20, 30)
    );
    assert_eq!(
        computed("color: rgba(10, 20, 30, 0.5)").color(),
        Color::rgba(10, 20, 30, 128)
    );
    assert_eq!(
        computed("color: hsl(120, 100%, 50%)").color(),
        Color::rgb(0, 255, 0)
    );
}

#[test]
fn test_lengths_and_keyword_sizes() {
    assert_eq!(computed("width: 50px").width(), Measure::px(50.0));
    assert_eq!(computed("width: 50%").width(), Measure::percent(50.0));
    assert!(computed("width: auto").width().is_auto());
    assert_eq!(computed("width: 0").width(), Measure::zero());
    assert_eq!(
        computed("font-size: 2em").font_size(),
        Measure::new(2.0, Unit::Em)
    );
    assert_eq!(computed("font-size: large").font_size(), Measure::px(17.0));
}

#[test]
fn test_display_and_position() {
    assert_eq!(computed("display: inline-block").display(), Display::InlineBlock);
    assert_eq!(computed("display: none").display(), Display::None);
    assert_eq!(
        computed("position: absolute").position(),
        moss_css::value::Position::Absolute
    );
}

#[test]
fn test_margin_shorthand_expansion() {
    let style = computed("margin: 1px 2px 3px 4px");
    let margin = style.sizes().margin;
    assert_eq!(margin.top, Measure::px(1.0));
    assert_eq!(margin.right, Measure::px(2.0));
    assert_eq!(margin.bottom, Measure::px(3.0));
    assert_eq!(margin.left, Measure::px(4.0));

    let style = computed("margin: 10px 20px");
    let margin = style.sizes().margin;
    assert_eq!(margin.top, Measure::px(10.0));
    assert_eq!(margin.right, Measure::px(20.0));
    assert_eq!(margin.bottom, Measure::px(10.0));
    assert_eq!(margin.left, Measure::px(20.0));

    let style = computed("margin: 0 auto");
    assert!(style.sizes().margin.left.is_auto());
    assert_eq!(style.sizes().margin.top, Measure::zero());
}

#[test]
fn test_padding_shorthand_expansion() {
    let style = computed("padding: 4px 8px");
    let padding = style.sizes().padding;
    assert_eq!(padding.top, Measure::px(4.0));
    assert_eq!(padding.right, Measure::px(8.0));
    assert_eq!(padding.bottom, Measure::px(4.0));
    assert_eq!(padding.left, Measure::px(8.0));
}

#[test]
fn test_border_shorthand() {
    let style = computed("border: 1px solid #ddd");
    for side in [
        style.border().top,
        style.border().right,
        style.border().bottom,
        style.border().left,
    ] {
        assert_eq!(side.width, Measure::px(1.0));
        assert_eq!(side.style, BorderStyle::Solid);
        assert_eq!(side.color, Color::rgb(0xDD, 0xDD, 0xDD));
    }
}

#[test]
fn test_border_shorthand_resets_missing_parts() {
    // A shorthand resets omitted sub-properties to their initial values.
    let style = computed("border-color: red; border: 1px dotted");
    assert_eq!(style.border().top.style, BorderStyle::Dotted);
    assert_eq!(style.border().top.width, Measure::px(1.0));
    assert_eq!(style.border().top.color, Color::TRANSPARENT);
}

#[test]
fn test_border_width_keywords() {
    assert_eq!(
        computed("border-top-width: thin").border().top.width,
        Measure::px(1.0)
    );
    assert_eq!(
        computed("border-top-width: thick").border().top.width,
        Measure::px(5.0)
    );
}

#[test]
fn test_border_radius() {
    let style = computed("border-radius: 4px");
    assert_eq!(style.border().radius.top_left, (Measure::px(4.0), Measure::px(4.0)));
    assert_eq!(style.border().radius.bottom_right, (Measure::px(4.0), Measure::px(4.0)));

    let style = computed("border-radius: 1px 2px / 3px");
    assert_eq!(style.border().radius.top_left, (Measure::px(1.0), Measure::px(3.0)));
    assert_eq!(style.border().radius.top_right, (Measure::px(2.0), Measure::px(3.0)));
    assert_eq!(style.border().radius.bottom_right, (Measure::px(1.0), Measure::px(3.0)));
}

#[test]
fn test_background_shorthand() {
    let style = computed("background: green url(bg.png) no-repeat fixed center top");
    assert_eq!(style.background_color(), Color::rgb(0, 128, 0));
    assert_eq!(style.background().image.as_deref(), Some("bg.png"));
    assert_eq!(
        style.background().repeat,
        moss_css::value::BackgroundRepeat::NoRepeat
    );
    assert_eq!(
        style.background().attachment,
        moss_css::value::BackgroundAttachment::Fixed
    );
    assert_eq!(style.background().position_x, Measure::percent(50.0));
    assert_eq!(style.background().position_y, Measure::percent(0.0));
}

#[test]
fn test_background_shorthand_resets_previous_image() {
    let style = computed("background-image: url(a.png); background: red");
    assert_eq!(style.background_color(), Color::rgb(255, 0, 0));
    assert_eq!(style.background().image, None);
}

#[test]
fn test_background_size() {
    assert_eq!(
        computed("background-size: cover").background().size,
        BackgroundSize::Cover
    );
    assert_eq!(
        computed("background-size: 10px 20px").background().size,
        BackgroundSize::Explicit(Measure::px(10.0), Measure::px(20.0))
    );
    let style = computed("background: url(x.png) left top / contain");
    assert_eq!(style.background().size, BackgroundSize::Contain);
}

#[test]
fn test_font_shorthand() {
    let style = computed("font: italic bold 12px/30px Georgia, serif");
    assert_eq!(style.inherited().font_style, moss_css::value::FontStyle::Italic);
    assert_eq!(style.inherited().font_weight, FontWeight::Bold);
    assert_eq!(style.font_size(), Measure::px(12.0));
    assert_eq!(style.inherited().line_height, Measure::px(30.0));
    assert_eq!(
        style.inherited().font_family,
        vec!["Georgia".to_string(), "serif".to_string()]
    );
}

#[test]
fn test_font_family_quoting() {
    let style = computed("font-family: \"Times New Roman\", Helvetica Neue, serif");
    assert_eq!(
        style.inherited().font_family,
        vec![
            "Times New Roman".to_string(),
            "Helvetica Neue".to_string(),
            "serif".to_string()
        ]
    );
}

#[test]
fn test_font_weight_numbers() {
    assert_eq!(
        computed("font-weight: 700").inherited().font_weight,
        FontWeight::Weight(700)
    );
    // Off-scale numbers are invalid and leave the default.
    let messages = Messages::new();
    let style = computed_with_messages("font-weight: 450", &messages);
    assert_eq!(style.inherited().font_weight, FontWeight::Normal);
}

#[test]
fn test_line_height_forms() {
    assert_eq!(
        computed("line-height: 1.6").inherited().line_height,
        Measure::new(1.6, Unit::None)
    );
    assert_eq!(
        computed("line-height: 24px").inherited().line_height,
        Measure::px(24.0)
    );
}

#[test]
fn test_flex_shorthand() {
    let style = computed("flex: none");
    assert_eq!(style.rare().flex_grow, 0.0);
    assert_eq!(style.rare().flex_shrink, 0.0);
    assert!(style.rare().flex_basis.is_auto());

    let style = computed("flex: 2");
    assert_eq!(style.rare().flex_grow, 2.0);
    assert_eq!(style.rare().flex_shrink, 1.0);
    assert_eq!(style.rare().flex_basis, Measure::percent(0.0));

    let style = computed("flex: 0 3 10em");
    assert_eq!(style.rare().flex_grow, 0.0);
    assert_eq!(style.rare().flex_shrink, 3.0);
    assert_eq!(style.rare().flex_basis, Measure::new(10.0, Unit::Em));
}

#[test]
fn test_overflow_axes() {
    let style = computed("overflow: hidden");
    assert_eq!(style.enums().overflow_x, Overflow::Hidden);
    assert_eq!(style.enums().overflow_y, Overflow::Hidden);

    let style = computed("overflow-x: scroll; overflow-y: auto");
    assert_eq!(style.enums().overflow_x, Overflow::Scroll);
    assert_eq!(style.enums().overflow_y, Overflow::Auto);
}

#[test]
fn test_box_shadow() {
    let style = computed("box-shadow: inset 1px 2px 3px 4px red, 5px 6px");
    let shadows = &style.rare().box_shadow;
    assert_eq!(shadows.len(), 2);
    assert!(shadows[0].inset);
    assert_eq!(shadows[0].offset_x, Measure::px(1.0));
    assert_eq!(shadows[0].blur, Measure::px(3.0));
    assert_eq!(shadows[0].spread, Measure::px(4.0));
    assert_eq!(shadows[0].color, Some(Color::rgb(255, 0, 0)));
    assert!(!shadows[1].inset);
    assert_eq!(shadows[1].color, None);

    assert!(computed("box-shadow: none").rare().box_shadow.is_empty());
}

#[test]
fn test_text_decoration() {
    let style = computed("text-decoration: underline line-through");
    assert!(style.rare().text_decoration.underline);
    assert!(style.rare().text_decoration.line_through);
    assert!(!style.rare().text_decoration.overline);
    assert!(computed("text-decoration: none").rare().text_decoration.is_none());
}

#[test]
fn test_vertical_align() {
    assert_eq!(
        computed("vertical-align: middle").sizes().vertical_align,
        VerticalAlign::Keyword(VerticalAlignKeyword::Middle)
    );
    assert_eq!(
        computed("vertical-align: 4px").sizes().vertical_align,
        VerticalAlign::Length(Measure::px(4.0))
    );
}

#[test]
fn test_counters_and_content() {
    let style = computed("counter-increment: section 2 note; counter-reset: page");
    assert_eq!(
        style.rare().counter_increment,
        vec![("section".to_string(), 2), ("note".to_string(), 1)]
    );
    assert_eq!(style.rare().counter_reset, vec![("page".to_string(), 0)]);

    let style = computed("content: \"(\" counter(section, upper-roman) \")\"");
    let items = style.rare().content.as_ref().expect("content set");
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1],
        moss_css::style::ContentItem::Counter {
            name: "section".to_string(),
            style: Some(ListStyleType::UpperRoman),
        }
    );
}

#[test]
fn test_cursor() {
    let style = computed("cursor: url(a.cur), url(b.cur), pointer");
    assert_eq!(style.inherited().cursor.images, vec!["a.cur", "b.cur"]);
    assert_eq!(style.inherited().cursor.keyword, Cursor::Pointer);
}

#[test]
fn test_clip_rect() {
    let style = computed("clip: rect(1px, 2px, 3px, auto)");
    let clip = style.rare().clip.expect("clip set");
    assert_eq!(clip[0], Measure::px(1.0));
    assert_eq!(clip[2], Measure::px(3.0));
    assert!(clip[3].is_auto());
}

#[test]
fn test_z_index_and_outline_offset() {
    assert_eq!(computed("z-index: 5").z_index(), 5);
    assert_eq!(computed("z-index: auto").z_index(), 0);
    assert_eq!(
        computed("outline-offset: 2px").border().outline.offset,
        Measure::px(2.0)
    );
}

#[test]
fn test_unknown_property_is_inert_and_warned() {
    let messages = Messages::new();
    let style = computed_with_messages("voice-family: announcer; color: red", &messages);
    // The unknown (aural) property changed nothing; the valid one still
    // applied.
    assert_eq!(style.color(), Color::rgb(255, 0, 0));
    assert_eq!(style, {
        let plain = computed("color: red");
        plain
    });
    assert!(!messages.is_empty());
    assert!(!messages.has_errors());
}

#[test]
fn test_invalid_value_is_inert_and_reported() {
    let messages = Messages::new();
    let style = computed_with_messages("color: 12px; width: 30px", &messages);
    assert_eq!(style.color(), Color::BLACK);
    assert_eq!(style.width(), Measure::px(30.0));
    assert!(messages.has_errors());
}

#[test]
fn test_strict_mode_escalates_warnings() {
    let messages = Messages::strict();
    let _ = computed_with_messages("bogus-prop: 1", &messages);
    assert!(messages.has_errors());
    assert!(messages.check().is_err());
}

#[test]
fn test_valid_sheet_parses_without_errors() {
    let messages = Messages::new();
    let _ = computed_with_messages(
        "color: red; margin: 0 auto; font: 12px serif; background: #fff url(a.png) repeat-x",
        &messages,
    );
    assert!(!messages.has_errors(), "{:?}", messages.entries());
}

#[test]
fn test_value_types_serialize() {
    let style = computed("color: #336699; width: 50%");
    let color = serde_json::to_value(style.color()).expect("color serializes");
    assert_eq!(color["r"], 0x33);
    assert_eq!(color["b"], 0x99);
    let sizes = serde_json::to_value(style.sizes()).expect("sizes serialize");
    assert_eq!(sizes["width"]["value"], 50.0);
}

#[test]
fn test_unknown_property_round_trip_tokens() {
    let messages = Messages::new();
    let sheet = moss_css::Stylesheet::parse(
        "p { frob: 3px spam(qux; zap) !important; }",
        "test.css",
        &messages,
    );
    let rule = &sheet.rules()[0];
    let property = &rule.properties.properties()[0];
    assert_eq!(property.id, PropertyId::Unknown);
    assert!(!property.flags.valid);
    assert!(property.flags.important);
    match &property.value {
        moss_css::PropertyValue::Raw { name, tokens } => {
            assert_eq!(name, "frob");
            // The body tokens survive, with the balanced `;` inside the
            // function preserved and `!important` stripped.
            let text: String = tokens.iter().map(|t| t.kind.to_string()).collect();
            assert_eq!(text.trim(), "3px spam(qux; zap)");
        }
        other => panic!("expected raw tokens, got {other:?}"),
    }
}
