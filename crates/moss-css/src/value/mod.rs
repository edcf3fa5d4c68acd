//! CSS value types: measures, colors, and keyword enums.

mod color;
mod keywords;
mod measure;

pub use color::Color;
pub use keywords::{
    AlignContent, AlignItems, AlignSelf, BackgroundAttachment, BackgroundRepeat, BorderCollapse,
    BorderStyle, BoxSizing, CaptionSide, Clear, Cursor, Direction, Display, EmptyCells, Float,
    FlexDirection, FlexWrap, FontStyle, FontVariant, FontWeight, JustifyContent, ListStylePosition,
    ListStyleType, Overflow, PageBreak, Position, TableLayout, TextAlign, TextDecoration,
    TextTransform, UnicodeBidi, VerticalAlignKeyword, Visibility, WhiteSpace,
};
pub use measure::{Measure, Unit};
