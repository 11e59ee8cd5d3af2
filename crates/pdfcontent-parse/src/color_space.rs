//! Color space resolution.
//!
//! A [`ColorSpace`] turns the raw operands of a color operator into a
//! [`Color`] value. Device spaces are known by name; every other family is
//! parsed from its array form as found in a `/ColorSpace` resource.

use pdfcontent_core::painting::Color;
use smol_str::SmolStr;

use crate::error::{ContentError, Result};
use crate::operand::Operand;

/// A resolved PDF color space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
    /// DeviceGray (1 component).
    DeviceGray,
    /// DeviceRGB (3 components).
    DeviceRGB,
    /// DeviceCMYK (4 components).
    DeviceCMYK,
    /// CalGray, CalRGB, Lab or ICCBased.
    CieBased {
        family: SmolStr,
        num_components: usize,
    },
    /// Palette-based space; the single component is an index into the
    /// lookup table.
    Indexed { base: Box<ColorSpace>, hival: u32 },
    /// Single-component spot color.
    Separation { colorant: SmolStr },
    /// Multi-component named colorants.
    DeviceN { colorants: Vec<SmolStr> },
    /// Pattern space, optionally with an underlying space for uncolored
    /// tiling patterns.
    Pattern { underlying: Option<Box<ColorSpace>> },
}

impl ColorSpace {
    /// Resolve a well-known color space name, including the inline image
    /// abbreviations `G`, `RGB` and `CMYK`.
    pub fn device(name: &str) -> Option<Self> {
        match name {
            "DeviceGray" | "G" => Some(ColorSpace::DeviceGray),
            "DeviceRGB" | "RGB" => Some(ColorSpace::DeviceRGB),
            "DeviceCMYK" | "CMYK" => Some(ColorSpace::DeviceCMYK),
            "Pattern" => Some(ColorSpace::Pattern { underlying: None }),
            _ => None,
        }
    }

    /// Parse a color space from its name or array form.
    ///
    /// Returns `None` for unknown families and malformed arrays.
    pub fn from_operand(operand: &Operand) -> Option<Self> {
        match operand {
            Operand::Name(name) => Self::device(name),
            Operand::Array(items) => Self::from_array(items),
            _ => None,
        }
    }

    fn from_array(items: &[Operand]) -> Option<Self> {
        let family = items.first()?.as_name()?;
        match family {
            "CalGray" => Some(Self::cie(family, 1)),
            "CalRGB" | "Lab" => Some(Self::cie(family, 3)),
            "ICCBased" => {
                let n = items
                    .get(1)
                    .and_then(Operand::as_dict)
                    .and_then(|dict| dict.get("N"))
                    .and_then(Operand::as_i64)
                    .unwrap_or(3);
                let n = usize::try_from(n).ok().filter(|n| matches!(n, 1 | 3 | 4))?;
                Some(Self::cie(family, n))
            }
            "Indexed" | "I" => {
                let base = Self::from_operand(items.get(1)?)?;
                let hival = items.get(2)?.as_i64()?;
                Some(ColorSpace::Indexed {
                    base: Box::new(base),
                    hival: u32::try_from(hival).ok()?,
                })
            }
            "Separation" => Some(ColorSpace::Separation {
                colorant: SmolStr::new(items.get(1)?.as_name()?),
            }),
            "DeviceN" => {
                let colorants = items
                    .get(1)?
                    .as_array()?
                    .iter()
                    .map(|c| c.as_name().map(SmolStr::new))
                    .collect::<Option<Vec<_>>>()?;
                Some(ColorSpace::DeviceN { colorants })
            }
            "Pattern" => {
                let underlying = match items.get(1) {
                    Some(base) => Some(Box::new(Self::from_operand(base)?)),
                    None => None,
                };
                Some(ColorSpace::Pattern { underlying })
            }
            _ if items.len() == 1 => Self::device(family),
            _ => None,
        }
    }

    fn cie(family: &str, num_components: usize) -> Self {
        ColorSpace::CieBased {
            family: SmolStr::new(family),
            num_components,
        }
    }

    /// Family name as written in a PDF.
    pub fn family(&self) -> &str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
            ColorSpace::CieBased { family, .. } => family.as_str(),
            ColorSpace::Indexed { .. } => "Indexed",
            ColorSpace::Separation { .. } => "Separation",
            ColorSpace::DeviceN { .. } => "DeviceN",
            ColorSpace::Pattern { .. } => "Pattern",
        }
    }

    /// Number of numeric components a color in this space carries.
    ///
    /// For pattern spaces this is the count of the underlying space (0 for
    /// colored patterns).
    pub fn num_components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
            ColorSpace::CieBased { num_components, .. } => *num_components,
            ColorSpace::Indexed { .. } | ColorSpace::Separation { .. } => 1,
            ColorSpace::DeviceN { colorants } => colorants.len(),
            ColorSpace::Pattern { underlying } => {
                underlying.as_ref().map_or(0, |base| base.num_components())
            }
        }
    }

    /// The color a graphics state holds right after this space is selected.
    pub fn initial_color(&self) -> Color {
        match self {
            ColorSpace::DeviceGray => Color::Gray(0.0),
            ColorSpace::DeviceRGB => Color::Rgb(0.0, 0.0, 0.0),
            ColorSpace::DeviceCMYK => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
            ColorSpace::CieBased { num_components, .. } => Color::Other(vec![0.0; *num_components]),
            ColorSpace::Indexed { .. } => Color::Other(vec![0.0]),
            ColorSpace::Separation { .. } | ColorSpace::DeviceN { .. } => {
                Color::Other(vec![1.0; self.num_components()])
            }
            ColorSpace::Pattern { .. } => Color::Pattern {
                name: None,
                components: Vec::new(),
            },
        }
    }

    /// Build a color from the operands of a color operator.
    ///
    /// Pattern spaces take the underlying components (if any) followed by a
    /// pattern name.
    ///
    /// # Errors
    ///
    /// [`ContentError::InvalidOperand`] when the component count does not
    /// match the space or a component is not a number.
    pub fn color(&self, components: &[Operand]) -> Result<Color> {
        if let ColorSpace::Pattern { .. } = self {
            let Some((last, rest)) = components.split_last() else {
                return Err(self.invalid("expected a pattern name"));
            };
            let name = last
                .as_name()
                .ok_or_else(|| self.invalid(format!("expected a pattern name, got {}", last.kind())))?;
            let values = self.numbers(rest)?;
            return Ok(Color::Pattern {
                name: Some(name.to_string()),
                components: values,
            });
        }

        let values = self.numbers(components)?;
        Ok(match (self, values.as_slice()) {
            (ColorSpace::DeviceGray, &[g]) => Color::Gray(g),
            (ColorSpace::DeviceRGB, &[r, g, b]) => Color::Rgb(r, g, b),
            (ColorSpace::DeviceCMYK, &[c, m, y, k]) => Color::Cmyk(c, m, y, k),
            (ColorSpace::Indexed { hival, .. }, &[index]) => {
                Color::Other(vec![index.clamp(0.0, f64::from(*hival))])
            }
            _ => Color::Other(values),
        })
    }

    /// Collect numeric components, checking the count against the space.
    fn numbers(&self, components: &[Operand]) -> Result<Vec<f64>> {
        let expected = self.num_components();
        if components.len() != expected {
            return Err(self.invalid(format!(
                "expected {expected} color components, got {}",
                components.len()
            )));
        }
        components
            .iter()
            .map(|c| {
                c.as_f64()
                    .ok_or_else(|| self.invalid(format!("expected a number, got {}", c.kind())))
            })
            .collect()
    }

    fn invalid(&self, reason: impl Into<String>) -> ContentError {
        ContentError::invalid_operand(self.family(), reason)
    }
}
