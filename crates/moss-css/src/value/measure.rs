//! Numeric values with units.

use std::fmt;

use serde::Serialize;

/// The unit attached to a [`Measure`].
///
/// `None` marks a bare number (valid for `0`, `line-height`, `z-index`,
/// flex factors); `Auto` marks the `auto` keyword, which several box
/// properties accept in place of a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Unit {
    /// A unitless number.
    #[default]
    None,
    /// Pixels; 1px = 1/96in.
    Px,
    /// The element's font size.
    Em,
    /// The x-height of the element's font.
    Ex,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Inches.
    In,
    /// Points; 1pt = 1/72in.
    Pt,
    /// Picas; 1pc = 12pt.
    Pc,
    /// A percentage of some reference value.
    Percent,
    /// Degrees.
    Deg,
    /// Radians.
    Rad,
    /// Gradians.
    Grad,
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Hertz.
    Hz,
    /// Kilohertz.
    KHz,
    /// The `auto` keyword.
    Auto,
}

impl Unit {
    /// Map a dimension suffix (case-insensitive) to its unit.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.to_ascii_lowercase();
        Some(match suffix.as_str() {
            "px" => Self::Px,
            "em" => Self::Em,
            "ex" => Self::Ex,
            "cm" => Self::Cm,
            "mm" => Self::Mm,
            "in" => Self::In,
            "pt" => Self::Pt,
            "pc" => Self::Pc,
            "deg" => Self::Deg,
            "rad" => Self::Rad,
            "grad" => Self::Grad,
            "s" => Self::S,
            "ms" => Self::Ms,
            "hz" => Self::Hz,
            "khz" => Self::KHz,
            _ => return None,
        })
    }

    /// True for the absolute and font-relative length units.
    #[must_use]
    pub fn is_length(self) -> bool {
        matches!(
            self,
            Self::Px | Self::Em | Self::Ex | Self::Cm | Self::Mm | Self::In | Self::Pt | Self::Pc
        )
    }

    /// True for the angle units.
    #[must_use]
    pub fn is_angle(self) -> bool {
        matches!(self, Self::Deg | Self::Rad | Self::Grad)
    }

    /// True for the time units.
    #[must_use]
    pub fn is_time(self) -> bool {
        matches!(self, Self::S | Self::Ms)
    }

    /// True for the frequency units.
    #[must_use]
    pub fn is_frequency(self) -> bool {
        matches!(self, Self::Hz | Self::KHz)
    }

    /// The canonical suffix text (empty for `None` and `Auto`).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::None | Self::Auto => "",
            Self::Px => "px",
            Self::Em => "em",
            Self::Ex => "ex",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::In => "in",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Percent => "%",
            Self::Deg => "deg",
            Self::Rad => "rad",
            Self::Grad => "grad",
            Self::S => "s",
            Self::Ms => "ms",
            Self::Hz => "hz",
            Self::KHz => "khz",
        }
    }
}

/// A numeric CSS value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measure {
    /// The numeric value; meaningless when the unit is [`Unit::Auto`].
    pub value: f64,
    /// The unit.
    pub unit: Unit,
}

impl Measure {
    /// A measure with an explicit unit.
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// The unitless zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, Unit::None)
    }

    /// The `auto` keyword.
    #[must_use]
    pub const fn auto() -> Self {
        Self::new(0.0, Unit::Auto)
    }

    /// A pixel length.
    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// True for the `auto` marker.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.unit == Unit::Auto
    }

    /// True for a zero value of any unit (but not `auto`).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.is_auto() && self.value == 0.0
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto() {
            return write!(f, "auto");
        }
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
