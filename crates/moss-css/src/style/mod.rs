//! The computed-style tree.
//!
//! [`ComputedStyle`] is a persistent (copy-on-write) record of the full
//! resolved property universe. It is partitioned into six sub-bags, each
//! behind an [`Arc`], so replacing one property clones only the bag it
//! lives in and shares the other five. The partition follows CSS
//! inheritance: everything in [`InheritedBag`] inherits, nothing else
//! does, which makes [`ComputedStyle::make_child`] a plain bag copy.

use std::sync::{Arc, LazyLock};

use serde::Serialize;

use crate::value::{
    AlignContent, AlignItems, AlignSelf, BackgroundAttachment, BackgroundRepeat, BorderCollapse,
    BorderStyle, BoxSizing, CaptionSide, Clear, Color, Cursor, Direction, Display, EmptyCells,
    Float, FlexDirection, FlexWrap, FontStyle, FontVariant, FontWeight, JustifyContent,
    ListStylePosition, ListStyleType, Measure, Overflow, PageBreak, Position, TableLayout,
    TextAlign, TextDecoration, TextTransform, UnicodeBidi, VerticalAlignKeyword, Visibility,
    WhiteSpace,
};

/// Four per-side measures (margins, paddings).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Edges {
    /// Top side.
    pub top: Measure,
    /// Right side.
    pub right: Measure,
    /// Bottom side.
    pub bottom: Measure,
    /// Left side.
    pub left: Measure,
}

impl Edges {
    /// The same measure on all four sides.
    #[must_use]
    pub const fn uniform(measure: Measure) -> Self {
        Self {
            top: measure,
            right: measure,
            bottom: measure,
            left: measure,
        }
    }
}

/// One border side: width, line style, color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderSide {
    /// Border width.
    pub width: Measure,
    /// Line style.
    pub style: BorderStyle,
    /// Line color.
    pub color: Color,
}

impl Default for BorderSide {
    fn default() -> Self {
        Self {
            width: Measure::px(3.0),
            style: BorderStyle::Solid,
            color: Color::TRANSPARENT,
        }
    }
}

/// Per-corner radii; each corner carries a horizontal and vertical
/// radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderRadius {
    /// Top-left corner.
    pub top_left: (Measure, Measure),
    /// Top-right corner.
    pub top_right: (Measure, Measure),
    /// Bottom-right corner.
    pub bottom_right: (Measure, Measure),
    /// Bottom-left corner.
    pub bottom_left: (Measure, Measure),
}

/// The outline ring around a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outline {
    /// Outline width.
    pub width: Measure,
    /// Line style.
    pub style: BorderStyle,
    /// Line color.
    pub color: Color,
    /// Offset from the border edge.
    pub offset: Measure,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            width: Measure::px(3.0),
            style: BorderStyle::None,
            color: Color::BLACK,
            offset: Measure::zero(),
        }
    }
}

/// `vertical-align`: a keyword or an explicit length/percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VerticalAlign {
    /// One of the alignment keywords.
    Keyword(VerticalAlignKeyword),
    /// A length or percentage above the baseline.
    Length(Measure),
}

impl Default for VerticalAlign {
    fn default() -> Self {
        Self::Keyword(VerticalAlignKeyword::Baseline)
    }
}

/// `background-size`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum BackgroundSize {
    /// Intrinsic size.
    #[default]
    Auto,
    /// Cover the painting area.
    Cover,
    /// Fit inside the painting area.
    Contain,
    /// Explicit width and height (either may be `auto`).
    Explicit(Measure, Measure),
}

/// One drop shadow of a `box-shadow`/`text-shadow` list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Shadow {
    /// Horizontal offset.
    pub offset_x: Measure,
    /// Vertical offset.
    pub offset_y: Measure,
    /// Blur radius.
    pub blur: Measure,
    /// Spread distance (box shadows only).
    pub spread: Measure,
    /// Shadow color; `None` takes the text color.
    pub color: Option<Color>,
    /// Inset shadow (box shadows only).
    pub inset: bool,
}

/// One piece of a `content` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentItem {
    /// A string literal.
    Text(String),
    /// An image.
    Uri(String),
    /// `counter(name, style?)`
    Counter {
        /// Counter name.
        name: String,
        /// Marker style, defaulting to decimal.
        style: Option<ListStyleType>,
    },
    /// `counters(name, separator, style?)`
    Counters {
        /// Counter name.
        name: String,
        /// Text between nesting levels.
        separator: String,
        /// Marker style, defaulting to decimal.
        style: Option<ListStyleType>,
    },
    /// `attr(name)`
    Attr(String),
    /// `open-quote`
    OpenQuote,
    /// `close-quote`
    CloseQuote,
    /// `no-open-quote`
    NoOpenQuote,
    /// `no-close-quote`
    NoCloseQuote,
}

/// `cursor`: optional image URIs, then a required keyword.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CursorValue {
    /// Cursor images, tried in order.
    pub images: Vec<String>,
    /// The fallback keyword.
    pub keyword: Cursor,
}

// ── the six bags ───────────────────────────────────────────────────────

/// Frequently consulted small enums.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnumBag {
    /// `display`
    pub display: Display,
    /// `position`
    pub position: Position,
    /// `float`
    pub float: Float,
    /// `clear`
    pub clear: Clear,
    /// `overflow-x`
    pub overflow_x: Overflow,
    /// `overflow-y`
    pub overflow_y: Overflow,
    /// `box-sizing`
    pub box_sizing: BoxSizing,
    /// `table-layout`
    pub table_layout: TableLayout,
    /// `unicode-bidi`
    pub unicode_bidi: UnicodeBidi,
    /// `z-index` (`0` is the initial value here).
    pub z_index: i32,
}

/// Box dimensions and offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeBag {
    /// `width`
    pub width: Measure,
    /// `height`
    pub height: Measure,
    /// `min-width`
    pub min_width: Measure,
    /// `max-width`; `None` is the `none` keyword.
    pub max_width: Option<Measure>,
    /// `min-height`
    pub min_height: Measure,
    /// `max-height`; `None` is the `none` keyword.
    pub max_height: Option<Measure>,
    /// `margin-*`
    pub margin: Edges,
    /// `padding-*`
    pub padding: Edges,
    /// `top`
    pub top: Measure,
    /// `right`
    pub right: Measure,
    /// `bottom`
    pub bottom: Measure,
    /// `left`
    pub left: Measure,
    /// `vertical-align`
    pub vertical_align: VerticalAlign,
}

impl Default for SizeBag {
    fn default() -> Self {
        Self {
            width: Measure::auto(),
            height: Measure::auto(),
            min_width: Measure::zero(),
            max_width: None,
            min_height: Measure::zero(),
            max_height: None,
            margin: Edges::default(),
            padding: Edges::default(),
            top: Measure::auto(),
            right: Measure::auto(),
            bottom: Measure::auto(),
            left: Measure::auto(),
            vertical_align: VerticalAlign::default(),
        }
    }
}

/// Background painting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundBag {
    /// `background-color`
    pub color: Color,
    /// `background-image`; `None` is the `none` keyword.
    pub image: Option<String>,
    /// `background-repeat`
    pub repeat: BackgroundRepeat,
    /// `background-attachment`
    pub attachment: BackgroundAttachment,
    /// `background-position` horizontal component.
    pub position_x: Measure,
    /// `background-position` vertical component.
    pub position_y: Measure,
    /// `background-size`
    pub size: BackgroundSize,
}

impl Default for BackgroundBag {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            image: None,
            repeat: BackgroundRepeat::default(),
            attachment: BackgroundAttachment::default(),
            position_x: Measure::percent(0.0),
            position_y: Measure::percent(0.0),
            size: BackgroundSize::default(),
        }
    }
}

/// Borders and the outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BorderBag {
    /// `border-top-*`
    pub top: BorderSide,
    /// `border-right-*`
    pub right: BorderSide,
    /// `border-bottom-*`
    pub bottom: BorderSide,
    /// `border-left-*`
    pub left: BorderSide,
    /// `border-radius`
    pub radius: BorderRadius,
    /// `outline-*` including `outline-offset`.
    pub outline: Outline,
}

/// Everything that inherits: text, fonts, tables, lists, visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InheritedBag {
    /// `color`
    pub color: Color,
    /// `font-family`, first preference first.
    pub font_family: Vec<String>,
    /// `font-size`
    pub font_size: Measure,
    /// `font-style`
    pub font_style: FontStyle,
    /// `font-variant`
    pub font_variant: FontVariant,
    /// `font-weight`
    pub font_weight: FontWeight,
    /// `line-height`
    pub line_height: Measure,
    /// `letter-spacing`; `None` is the `normal` keyword.
    pub letter_spacing: Option<Measure>,
    /// `word-spacing`; `None` is the `normal` keyword.
    pub word_spacing: Option<Measure>,
    /// `text-align`
    pub text_align: TextAlign,
    /// `text-indent`
    pub text_indent: Measure,
    /// `text-transform`
    pub text_transform: TextTransform,
    /// `white-space`
    pub white_space: WhiteSpace,
    /// `direction`
    pub direction: Direction,
    /// `visibility`
    pub visibility: Visibility,
    /// `border-collapse`
    pub border_collapse: BorderCollapse,
    /// `border-spacing` (horizontal, vertical).
    pub border_spacing: (Measure, Measure),
    /// `caption-side`
    pub caption_side: CaptionSide,
    /// `empty-cells`
    pub empty_cells: EmptyCells,
    /// `list-style-type`
    pub list_style_type: ListStyleType,
    /// `list-style-position`
    pub list_style_position: ListStylePosition,
    /// `list-style-image`; `None` is the `none` keyword.
    pub list_style_image: Option<String>,
    /// `quotes`; `None` leaves the user agent default.
    pub quotes: Option<Vec<(String, String)>>,
    /// `cursor`
    pub cursor: CursorValue,
    /// `widows`
    pub widows: i32,
    /// `orphans`
    pub orphans: i32,
}

impl Default for InheritedBag {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            font_family: vec!["serif".to_string()],
            font_size: Measure::px(14.0),
            font_style: FontStyle::default(),
            font_variant: FontVariant::default(),
            font_weight: FontWeight::default(),
            line_height: Measure::percent(120.0),
            letter_spacing: None,
            word_spacing: None,
            text_align: TextAlign::default(),
            text_indent: Measure::zero(),
            text_transform: TextTransform::default(),
            white_space: WhiteSpace::default(),
            direction: Direction::default(),
            visibility: Visibility::default(),
            border_collapse: BorderCollapse::default(),
            border_spacing: (Measure::zero(), Measure::zero()),
            caption_side: CaptionSide::default(),
            empty_cells: EmptyCells::default(),
            list_style_type: ListStyleType::default(),
            list_style_position: ListStylePosition::default(),
            list_style_image: None,
            quotes: None,
            cursor: CursorValue::default(),
            widows: 2,
            orphans: 2,
        }
    }
}

/// Flex, paged-media, generated-content, and other rarely-set
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RareBag {
    /// `flex-grow`
    pub flex_grow: f64,
    /// `flex-shrink`
    pub flex_shrink: f64,
    /// `flex-basis`
    pub flex_basis: Measure,
    /// `flex-direction`
    pub flex_direction: FlexDirection,
    /// `flex-wrap`
    pub flex_wrap: FlexWrap,
    /// `order`
    pub order: i32,
    /// `justify-content`
    pub justify_content: JustifyContent,
    /// `align-items`
    pub align_items: AlignItems,
    /// `align-content`
    pub align_content: AlignContent,
    /// `align-self`
    pub align_self: AlignSelf,
    /// `page-break-before`
    pub page_break_before: PageBreak,
    /// `page-break-after`
    pub page_break_after: PageBreak,
    /// `page-break-inside`
    pub page_break_inside: PageBreak,
    /// `content`; `None` is `normal`.
    pub content: Option<Vec<ContentItem>>,
    /// `counter-increment`: `(name, delta)` pairs.
    pub counter_increment: Vec<(String, i32)>,
    /// `counter-reset`: `(name, start)` pairs.
    pub counter_reset: Vec<(String, i32)>,
    /// `clip`; `None` is `auto`.
    pub clip: Option<[Measure; 4]>,
    /// `text-decoration`
    pub text_decoration: TextDecoration,
    /// `text-shadow`
    pub text_shadow: Vec<Shadow>,
    /// `box-shadow`
    pub box_shadow: Vec<Shadow>,
    /// `opacity`
    pub opacity: f64,
}

impl Default for RareBag {
    fn default() -> Self {
        Self {
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Measure::auto(),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            order: 0,
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            align_self: AlignSelf::default(),
            page_break_before: PageBreak::default(),
            page_break_after: PageBreak::default(),
            page_break_inside: PageBreak::default(),
            content: None,
            counter_increment: Vec::new(),
            counter_reset: Vec::new(),
            clip: None,
            text_decoration: TextDecoration::NONE,
            text_shadow: Vec::new(),
            box_shadow: Vec::new(),
            opacity: 1.0,
        }
    }
}

static DEFAULT_STYLE: LazyLock<ComputedStyle> = LazyLock::new(ComputedStyle::default);

/// The resolved style of one element.
///
/// Immutable: every `with_*` operation returns a new value sharing all
/// untouched bags with the original.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComputedStyle {
    enums: Arc<EnumBag>,
    sizes: Arc<SizeBag>,
    background: Arc<BackgroundBag>,
    border: Arc<BorderBag>,
    inherited: Arc<InheritedBag>,
    rare: Arc<RareBag>,
}

impl ComputedStyle {
    /// The shared all-defaults style.
    #[must_use]
    pub fn default_ref() -> &'static Self {
        &DEFAULT_STYLE
    }

    /// A style whose inheritable portion equals `parent`'s and whose
    /// non-inheritable portion is the default.
    #[must_use]
    pub fn make_child(parent: &Self) -> Self {
        Self {
            inherited: Arc::clone(&parent.inherited),
            ..Self::default()
        }
    }

    // ── bag accessors ───────────────────────────────────────────────────

    /// The small-enum bag.
    #[must_use]
    pub fn enums(&self) -> &EnumBag {
        &self.enums
    }

    /// The size bag.
    #[must_use]
    pub fn sizes(&self) -> &SizeBag {
        &self.sizes
    }

    /// The background bag.
    #[must_use]
    pub fn background(&self) -> &BackgroundBag {
        &self.background
    }

    /// The border bag.
    #[must_use]
    pub fn border(&self) -> &BorderBag {
        &self.border
    }

    /// The inherited bag.
    #[must_use]
    pub fn inherited(&self) -> &InheritedBag {
        &self.inherited
    }

    /// The rare-property bag.
    #[must_use]
    pub fn rare(&self) -> &RareBag {
        &self.rare
    }

    // ── copy-on-write mutators ─────────────────────────────────────────
    //
    // Each clones the style, applies `f` to a unique copy of the one
    // affected bag, and leaves the other five shared.

    /// Replace within the enum bag.
    #[must_use]
    pub fn with_enums(&self, f: impl FnOnce(&mut EnumBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.enums));
        style
    }

    /// Replace within the size bag.
    #[must_use]
    pub fn with_sizes(&self, f: impl FnOnce(&mut SizeBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.sizes));
        style
    }

    /// Replace within the background bag.
    #[must_use]
    pub fn with_background(&self, f: impl FnOnce(&mut BackgroundBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.background));
        style
    }

    /// Replace within the border bag.
    #[must_use]
    pub fn with_border(&self, f: impl FnOnce(&mut BorderBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.border));
        style
    }

    /// Replace within the inherited bag.
    #[must_use]
    pub fn with_inherited(&self, f: impl FnOnce(&mut InheritedBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.inherited));
        style
    }

    /// Replace within the rare bag.
    #[must_use]
    pub fn with_rare(&self, f: impl FnOnce(&mut RareBag)) -> Self {
        let mut style = self.clone();
        f(Arc::make_mut(&mut style.rare));
        style
    }

    // ── typed conveniences ─────────────────────────────────────────────

    /// `display`
    #[must_use]
    pub fn display(&self) -> Display {
        self.enums.display
    }

    /// Replace `display`.
    #[must_use]
    pub fn with_display(&self, display: Display) -> Self {
        self.with_enums(|e| e.display = display)
    }

    /// `position`
    #[must_use]
    pub fn position(&self) -> Position {
        self.enums.position
    }

    /// `color`
    #[must_use]
    pub fn color(&self) -> Color {
        self.inherited.color
    }

    /// Replace `color`.
    #[must_use]
    pub fn with_color(&self, color: Color) -> Self {
        self.with_inherited(|i| i.color = color)
    }

    /// `background-color`
    #[must_use]
    pub fn background_color(&self) -> Color {
        self.background.color
    }

    /// Replace `background-color`.
    #[must_use]
    pub fn with_background_color(&self, color: Color) -> Self {
        self.with_background(|b| b.color = color)
    }

    /// `font-size`
    #[must_use]
    pub fn font_size(&self) -> Measure {
        self.inherited.font_size
    }

    /// Replace `font-size`.
    #[must_use]
    pub fn with_font_size(&self, size: Measure) -> Self {
        self.with_inherited(|i| i.font_size = size)
    }

    /// `width`
    #[must_use]
    pub fn width(&self) -> Measure {
        self.sizes.width
    }

    /// Replace `width`.
    #[must_use]
    pub fn with_width(&self, width: Measure) -> Self {
        self.with_sizes(|s| s.width = width)
    }

    /// `z-index`
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.enums.z_index
    }

    /// True if the two styles share every bag allocation (cheap identity
    /// check used in tests and caches).
    #[must_use]
    pub fn shares_all_bags_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.enums, &other.enums)
            && Arc::ptr_eq(&self.sizes, &other.sizes)
            && Arc::ptr_eq(&self.background, &other.background)
            && Arc::ptr_eq(&self.border, &other.border)
            && Arc::ptr_eq(&self.inherited, &other.inherited)
            && Arc::ptr_eq(&self.rare, &other.rare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_replaces_only_its_target() {
        let base = ComputedStyle::default();
        let red = base.with_color(Color::rgb(255, 0, 0));
        assert_eq!(red.color(), Color::rgb(255, 0, 0));
        assert_eq!(base.color(), Color::BLACK);
        // Untouched bags are shared, not copied.
        assert!(Arc::ptr_eq(&base.sizes, &red.sizes));
        assert!(Arc::ptr_eq(&base.enums, &red.enums));
        assert!(!Arc::ptr_eq(&base.inherited, &red.inherited));
        // Equal on everything but the changed property.
        assert_eq!(base.sizes(), red.sizes());
        assert_eq!(base.enums(), red.enums());
    }

    #[test]
    fn defaults_follow_the_initial_values() {
        let style = ComputedStyle::default();
        assert_eq!(style.display(), Display::Block);
        assert_eq!(style.position(), Position::Static);
        assert_eq!(style.color(), Color::BLACK);
        assert_eq!(style.background_color(), Color::TRANSPARENT);
        assert_eq!(style.font_size(), Measure::px(14.0));
        assert_eq!(style.inherited().line_height, Measure::percent(120.0));
        assert_eq!(style.inherited().font_family, vec!["serif".to_string()]);
        assert_eq!(style.border().top.width, Measure::px(3.0));
        assert_eq!(style.border().top.style, BorderStyle::Solid);
        assert_eq!(style.border().top.color, Color::TRANSPARENT);
        assert_eq!(style.rare().flex_grow, 0.0);
        assert_eq!(style.rare().flex_shrink, 1.0);
        assert!(style.rare().flex_basis.is_auto());
        assert_eq!(style.z_index(), 0);
    }

    #[test]
    fn make_child_inherits_only_the_inherited_bag() {
        let parent = ComputedStyle::default()
            .with_color(Color::rgb(0, 128, 0))
            .with_background_color(Color::rgb(1, 2, 3))
            .with_display(Display::Flex);
        let child = ComputedStyle::make_child(&parent);
        assert_eq!(child.color(), Color::rgb(0, 128, 0));
        assert!(Arc::ptr_eq(&parent.inherited, &child.inherited));
        assert_eq!(child.background_color(), Color::TRANSPARENT);
        assert_eq!(child.display(), Display::Block);
    }
}
