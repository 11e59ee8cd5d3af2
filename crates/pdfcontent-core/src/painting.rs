//! Painting parameters held by the graphics state.
//!
//! Line style enumerations, dash patterns, rendering intents, blend modes,
//! text rendering modes and resolved color values.

use std::fmt;

/// Line cap style (`J` operator, `LC` ExtGState key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCapStyle {
    /// Stroke squared off at the endpoint (default).
    #[default]
    Butt = 0,
    /// Semicircular arc around the endpoint.
    Round = 1,
    /// Stroke continues half a line width past the endpoint.
    ProjectingSquare = 2,
}

impl LineCapStyle {
    /// Map the numeric operand value; `None` outside 0..=2.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Butt),
            1 => Some(Self::Round),
            2 => Some(Self::ProjectingSquare),
            _ => None,
        }
    }
}

/// Line join style (`j` operator, `LJ` ExtGState key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoinStyle {
    /// Outer edges extended until they meet (default).
    #[default]
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

impl LineJoinStyle {
    /// Map the numeric operand value; `None` outside 0..=2.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Miter),
            1 => Some(Self::Round),
            2 => Some(Self::Bevel),
            _ => None,
        }
    }
}

/// Line dash pattern (`d` operator, `D` ExtGState key).
///
/// An empty dash array denotes a solid line.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashPattern {
    /// Alternating dash and gap lengths.
    pub dash_array: Vec<f64>,
    /// Distance into the pattern at which the dash starts.
    pub dash_phase: f64,
}

impl DashPattern {
    pub fn new(dash_array: Vec<f64>, dash_phase: f64) -> Self {
        Self {
            dash_array,
            dash_phase,
        }
    }

    /// A solid line.
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn is_solid(&self) -> bool {
        self.dash_array.is_empty()
    }
}

/// Color rendering intent (`ri` operator, `RI` ExtGState key).
///
/// Names outside the four standard intents, and the integer codes some
/// producers write, are kept as given rather than mapped onto a standard
/// intent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderingIntent {
    AbsoluteColorimetric,
    #[default]
    RelativeColorimetric,
    Saturation,
    Perceptual,
    /// A non-standard intent name.
    Other(String),
    /// An integer intent value.
    Numeric(i64),
}

impl RenderingIntent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "AbsoluteColorimetric" => Self::AbsoluteColorimetric,
            "RelativeColorimetric" => Self::RelativeColorimetric,
            "Saturation" => Self::Saturation,
            "Perceptual" => Self::Perceptual,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RenderingIntent {
    /// The intent name, or the integer for [`Numeric`](Self::Numeric).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsoluteColorimetric => f.write_str("AbsoluteColorimetric"),
            Self::RelativeColorimetric => f.write_str("RelativeColorimetric"),
            Self::Saturation => f.write_str("Saturation"),
            Self::Perceptual => f.write_str("Perceptual"),
            Self::Other(name) => f.write_str(name),
            Self::Numeric(value) => write!(f, "{value}"),
        }
    }
}

/// Blend mode (`BM` ExtGState key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Map a blend mode name. `Compatible` is an alias of `Normal`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mode = match name {
            "Normal" | "Compatible" => Self::Normal,
            "Multiply" => Self::Multiply,
            "Screen" => Self::Screen,
            "Overlay" => Self::Overlay,
            "Darken" => Self::Darken,
            "Lighten" => Self::Lighten,
            "ColorDodge" => Self::ColorDodge,
            "ColorBurn" => Self::ColorBurn,
            "HardLight" => Self::HardLight,
            "SoftLight" => Self::SoftLight,
            "Difference" => Self::Difference,
            "Exclusion" => Self::Exclusion,
            "Hue" => Self::Hue,
            "Saturation" => Self::Saturation,
            "Color" => Self::Color,
            "Luminosity" => Self::Luminosity,
            _ => return None,
        };
        Some(mode)
    }
}

/// Text rendering mode values (Tr operator).
///
/// Determines how character glyphs are painted (filled, stroked, clipped, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextRenderingMode {
    /// Fill character glyphs (default).
    #[default]
    Fill = 0,
    Stroke = 1,
    FillStroke = 2,
    /// Neither fill nor stroke (invisible text).
    Invisible = 3,
    FillClip = 4,
    StrokeClip = 5,
    FillStrokeClip = 6,
    /// Add to clipping path only.
    Clip = 7,
}

impl TextRenderingMode {
    /// Create a mode from an integer value (0-7).
    /// Returns None for invalid values.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }
}

/// A color value resolved through a color space.
///
/// Only device colors carry typed components; the remaining spaces keep their
/// raw component values without colorimetric conversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray value.
    Gray(f64),
    /// DeviceRGB components.
    Rgb(f64, f64, f64),
    /// DeviceCMYK components.
    Cmyk(f64, f64, f64, f64),
    /// Components of any other color space (CIE-based, Indexed, Separation, DeviceN).
    Other(Vec<f64>),
    /// A pattern reference, with the underlying color components for
    /// uncolored tiling patterns.
    Pattern {
        name: Option<String>,
        components: Vec<f64>,
    },
}

impl Color {
    /// Black in DeviceGray, the initial color of every graphics state.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}
