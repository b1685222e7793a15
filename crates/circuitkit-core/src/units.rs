//! Length units for document geometry
//!
//! Document sizes and grid spacing are stored in physical units and
//! converted to canvas pixels at a fixed resolution of 200 pixels per inch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnitError;

/// Canvas resolution used for every physical-to-pixel conversion.
pub const PIXELS_PER_INCH: f64 = 200.0;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Unit a [`Size`] is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Canvas pixels at 1:1 zoom
    Px,
    /// Millimeters
    #[default]
    Mm,
    /// Centimeters
    Cm,
    /// Inches
    In,
}

impl LengthUnit {
    /// How many of this unit make up one inch.
    pub fn per_inch(self) -> f64 {
        match self {
            Self::Px => PIXELS_PER_INCH,
            Self::Mm => MM_PER_INCH,
            Self::Cm => MM_PER_INCH / 10.0,
            Self::In => 1.0,
        }
    }

    /// Short suffix used for display and parsing
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "px" => Ok(Self::Px),
            "mm" => Ok(Self::Mm),
            "cm" => Ok(Self::Cm),
            "in" | "inch" | "\"" => Ok(Self::In),
            other => Err(UnitError::UnknownUnit(other.to_string())),
        }
    }
}

/// A physical length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Magnitude in `unit`
    pub value: f64,
    /// Unit of `value`
    pub unit: LengthUnit,
}

impl Size {
    /// Create a new size
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Shorthand for a size in millimeters
    pub const fn mm(value: f64) -> Self {
        Self::new(value, LengthUnit::Mm)
    }

    /// Shorthand for a size in inches
    pub const fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::In)
    }

    /// Shorthand for a size in pixels
    pub const fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Convert to inches
    pub fn to_inches(&self) -> f64 {
        self.value / self.unit.per_inch()
    }

    /// Convert to canvas pixels at 1:1 zoom
    pub fn to_pixels(&self) -> f64 {
        self.to_inches() * PIXELS_PER_INCH
    }

    /// Express this size in another unit
    pub fn convert_to(&self, unit: LengthUnit) -> Size {
        Size::new(self.to_inches() * unit.per_inch(), unit)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.fract() == 0.0 {
            format!("{}", self.value)
        } else {
            format!("{:.3}", self.value)
                .trim_end_matches('0')
                .to_string()
        };
        write!(f, "{} {}", value, self.unit)
    }
}

impl FromStr for Size {
    type Err = UnitError;

    /// Parses strings such as `"5 in"`, `"12.7mm"`, `"-3 px"` or a bare number (millimeters).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UnitError::Empty);
        }

        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|_| UnitError::InvalidNumber(number.trim().to_string()))?;

        let unit = if suffix.trim().is_empty() {
            LengthUnit::default()
        } else {
            suffix.parse()?
        };
        Ok(Size::new(value, unit))
    }
}
