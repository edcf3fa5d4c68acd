//! Keyword enums for the enumerated CSS properties.
//!
//! Each enum maps its hyphenated CSS keyword spelling to a variant via
//! `strum` (kebab-case, case-insensitive), so the grammar layer can parse
//! with `FromStr` and serialization falls out of `Display`.

use serde::Serialize;

/// `display` values. Initial value here is `block`, which suits an
/// embeddable engine whose host trees are element-only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Display {
    /// Inline-level box.
    Inline,
    /// Block-level box.
    #[default]
    Block,
    /// Block box with a list marker.
    ListItem,
    /// Run-in box.
    RunIn,
    /// Inline-level block container.
    InlineBlock,
    /// Table box.
    Table,
    /// Inline-level table box.
    InlineTable,
    /// `table-row-group`.
    TableRowGroup,
    /// `table-header-group`.
    TableHeaderGroup,
    /// `table-footer-group`.
    TableFooterGroup,
    /// `table-row`.
    TableRow,
    /// `table-column-group`.
    TableColumnGroup,
    /// `table-column`.
    TableColumn,
    /// `table-cell`.
    TableCell,
    /// `table-caption`.
    TableCaption,
    /// Flex container.
    Flex,
    /// Inline-level flex container.
    InlineFlex,
    /// No box at all.
    None,
}

/// `position` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// Offset from normal-flow position.
    Relative,
    /// Out of flow, relative to the containing block.
    Absolute,
    /// Out of flow, relative to the viewport.
    Fixed,
}

/// `float` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Float {
    /// Not floated.
    #[default]
    None,
    /// Float left.
    Left,
    /// Float right.
    Right,
}

/// `clear` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Clear {
    /// No clearance.
    #[default]
    None,
    /// Clear past left floats.
    Left,
    /// Clear past right floats.
    Right,
    /// Clear past all floats.
    Both,
}

/// `visibility` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Visibility {
    /// Rendered normally.
    #[default]
    Visible,
    /// Invisible but laid out.
    Hidden,
    /// Collapsed (tables); otherwise as `hidden`.
    Collapse,
}

/// `overflow-x` / `overflow-y` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Overflow {
    /// Content spills out.
    #[default]
    Visible,
    /// Content clipped.
    Hidden,
    /// Always show scrolling mechanism.
    Scroll,
    /// Scroll when needed.
    Auto,
}

/// `white-space` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// Collapse whitespace, wrap as needed.
    #[default]
    Normal,
    /// Preserve whitespace, no wrapping.
    Pre,
    /// Collapse whitespace, no wrapping.
    Nowrap,
    /// Preserve whitespace, wrap as needed.
    PreWrap,
    /// Collapse spaces, preserve newlines.
    PreLine,
}

/// `text-align` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Align to the right edge.
    Right,
    /// Center lines.
    Center,
    /// Justify lines.
    Justify,
}

/// `text-transform` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextTransform {
    /// No transformation.
    #[default]
    None,
    /// Uppercase the first letter of each word.
    Capitalize,
    /// All uppercase.
    Uppercase,
    /// All lowercase.
    Lowercase,
}

/// `font-style` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic face.
    Italic,
    /// Sloped face.
    Oblique,
}

/// `font-variant` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontVariant {
    /// Normal glyphs.
    #[default]
    Normal,
    /// Small capitals.
    SmallCaps,
}

/// `font-weight`: a keyword or an explicit weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontWeight {
    /// Weight 400.
    #[default]
    Normal,
    /// Weight 700.
    Bold,
    /// One step heavier than inherited.
    Bolder,
    /// One step lighter than inherited.
    Lighter,
    /// An explicit multiple of 100 in 100..=900.
    Weight(u16),
}

impl FontWeight {
    /// Parse a `font-weight` keyword.
    #[must_use]
    pub fn from_keyword(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Some(match name.as_str() {
            "normal" => Self::Normal,
            "bold" => Self::Bold,
            "bolder" => Self::Bolder,
            "lighter" => Self::Lighter,
            _ => return None,
        })
    }

    /// Accept an explicit numeric weight (multiples of 100, 100..=900).
    #[must_use]
    pub fn from_number(raw: f64) -> Option<Self> {
        if raw.fract() != 0.0 || !(100.0..=900.0).contains(&raw) {
            return None;
        }
        let value = raw as u16;
        (value % 100 == 0).then_some(Self::Weight(value))
    }
}

/// `direction` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// `unicode-bidi` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum UnicodeBidi {
    /// No additional embedding.
    #[default]
    Normal,
    /// Open an embedding level.
    Embed,
    /// Override the bidi algorithm.
    BidiOverride,
}

/// `border-style` values (per side).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderStyle {
    /// No border.
    None,
    /// As `none`, but wins border-collapse conflicts.
    Hidden,
    /// Dots.
    Dotted,
    /// Dashes.
    Dashed,
    /// A single line.
    #[default]
    Solid,
    /// Two lines.
    Double,
    /// Carved appearance.
    Groove,
    /// Embossed appearance.
    Ridge,
    /// Sunken appearance.
    Inset,
    /// Raised appearance.
    Outset,
}

/// `background-repeat` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BackgroundRepeat {
    /// Tile both axes.
    #[default]
    Repeat,
    /// Tile horizontally.
    RepeatX,
    /// Tile vertically.
    RepeatY,
    /// Paint once.
    NoRepeat,
}

/// `background-attachment` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BackgroundAttachment {
    /// Scrolls with the document.
    #[default]
    Scroll,
    /// Fixed to the viewport.
    Fixed,
}

/// `list-style-type` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ListStyleType {
    /// Filled circle.
    #[default]
    Disc,
    /// Open circle.
    Circle,
    /// Filled square.
    Square,
    /// 1, 2, 3…
    Decimal,
    /// 01, 02, 03…
    DecimalLeadingZero,
    /// i, ii, iii…
    LowerRoman,
    /// I, II, III…
    UpperRoman,
    /// α, β, γ…
    LowerGreek,
    /// a, b, c…
    LowerLatin,
    /// A, B, C…
    UpperLatin,
    /// Armenian numbering.
    Armenian,
    /// Georgian numbering.
    Georgian,
    /// a, b, c… (alias of lower-latin).
    LowerAlpha,
    /// A, B, C… (alias of upper-latin).
    UpperAlpha,
    /// No marker.
    None,
}

/// `list-style-position` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ListStylePosition {
    /// Marker inside the principal box.
    Inside,
    /// Marker outside the principal box.
    #[default]
    Outside,
}

/// `caption-side` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CaptionSide {
    /// Caption above the table.
    #[default]
    Top,
    /// Caption below the table.
    Bottom,
}

/// `empty-cells` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum EmptyCells {
    /// Draw borders and backgrounds of empty cells.
    #[default]
    Show,
    /// Hide them.
    Hide,
}

/// `table-layout` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TableLayout {
    /// Content-based column sizing.
    #[default]
    Auto,
    /// First-row-based column sizing.
    Fixed,
}

/// `border-collapse` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderCollapse {
    /// Separate borders per cell.
    #[default]
    Separate,
    /// Adjacent cell borders collapse.
    Collapse,
}

/// `page-break-before` / `page-break-after` / `page-break-inside` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PageBreak {
    /// Neither forced nor forbidden.
    #[default]
    Auto,
    /// Force a break.
    Always,
    /// Avoid a break.
    Avoid,
    /// Force a break so the next page is a left page.
    Left,
    /// Force a break so the next page is a right page.
    Right,
}

/// `box-sizing` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BoxSizing {
    /// Width/height size the content box.
    #[default]
    ContentBox,
    /// Width/height size the border box.
    BorderBox,
}

/// `flex-direction` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexDirection {
    /// Main axis follows the inline direction.
    #[default]
    Row,
    /// Reversed row.
    RowReverse,
    /// Main axis follows the block direction.
    Column,
    /// Reversed column.
    ColumnReverse,
}

/// `flex-wrap` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexWrap {
    /// Single line.
    #[default]
    Nowrap,
    /// Wrap onto more lines.
    Wrap,
    /// Wrap in reverse order.
    WrapReverse,
}

/// `justify-content` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum JustifyContent {
    /// Pack toward the main start.
    #[default]
    FlexStart,
    /// Pack toward the main end.
    FlexEnd,
    /// Center along the main axis.
    Center,
    /// Even gaps, flush ends.
    SpaceBetween,
    /// Even space around each item.
    SpaceAround,
}

/// `align-items` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignItems {
    /// Cross-start alignment.
    FlexStart,
    /// Cross-end alignment.
    FlexEnd,
    /// Centered on the cross axis.
    Center,
    /// Baselines align.
    Baseline,
    /// Stretch to fill the line.
    #[default]
    Stretch,
}

/// `align-content` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignContent {
    /// Lines packed to cross start.
    FlexStart,
    /// Lines packed to cross end.
    FlexEnd,
    /// Lines centered.
    Center,
    /// Even gaps, flush ends.
    SpaceBetween,
    /// Even space around each line.
    SpaceAround,
    /// Lines stretch to fill.
    #[default]
    Stretch,
}

/// `align-self` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignSelf {
    /// Use the parent's `align-items`.
    #[default]
    Auto,
    /// Cross-start alignment.
    FlexStart,
    /// Cross-end alignment.
    FlexEnd,
    /// Centered on the cross axis.
    Center,
    /// Baselines align.
    Baseline,
    /// Stretch to fill the line.
    Stretch,
}

/// The keyword alternatives of `vertical-align` (lengths and percentages
/// are carried separately as measures).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VerticalAlignKeyword {
    /// Align baselines.
    #[default]
    Baseline,
    /// Subscript position.
    Sub,
    /// Superscript position.
    Super,
    /// Align with the line box top.
    Top,
    /// Align with the parent's text top.
    TextTop,
    /// Center within the line box.
    Middle,
    /// Align with the line box bottom.
    Bottom,
    /// Align with the parent's text bottom.
    TextBottom,
}

/// `cursor` keyword values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Cursor {
    /// UA decides from context.
    #[default]
    Auto,
    /// Crosshair.
    Crosshair,
    /// Platform default arrow.
    Default,
    /// Link pointer.
    Pointer,
    /// Something is to be moved.
    Move,
    /// East edge resize.
    EResize,
    /// North-east corner resize.
    NeResize,
    /// North-west corner resize.
    NwResize,
    /// North edge resize.
    NResize,
    /// South-east corner resize.
    SeResize,
    /// South-west corner resize.
    SwResize,
    /// South edge resize.
    SResize,
    /// West edge resize.
    WResize,
    /// Text selection beam.
    Text,
    /// Busy.
    Wait,
    /// Help available.
    Help,
    /// Busy but interactive.
    Progress,
}

/// The `text-decoration` line set; the keywords combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextDecoration {
    /// `underline`
    pub underline: bool,
    /// `overline`
    pub overline: bool,
    /// `line-through`
    pub line_through: bool,
    /// `blink`
    pub blink: bool,
}

impl TextDecoration {
    /// The `none` value.
    pub const NONE: Self = Self {
        underline: false,
        overline: false,
        line_through: false,
        blink: false,
    };

    /// True if no line is drawn.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Set the line named by `keyword`, returning false for an unknown
    /// keyword.
    pub fn set_keyword(&mut self, keyword: &str) -> bool {
        match keyword.to_ascii_lowercase().as_str() {
            "underline" => self.underline = true,
            "overline" => self.overline = true,
            "line-through" => self.line_through = true,
            "blink" => self.blink = true,
            _ => return false,
        }
        true
    }
}
