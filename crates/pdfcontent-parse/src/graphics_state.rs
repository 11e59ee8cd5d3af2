//! The graphics state: every drawing parameter that `q`/`Q` save and restore.

use pdfcontent_core::geometry::Matrix;
use pdfcontent_core::painting::{
    BlendMode, Color, DashPattern, LineCapStyle, LineJoinStyle, RenderingIntent,
};

use crate::color_space::ColorSpace;
use crate::error::{ContentError, Result};
use crate::operand::{Dictionary, Operand};
use crate::text_state::TextState;

/// Device-independent graphics state parameters (PDF 32000-1 Tables 52/53),
/// with the nested [`TextState`].
///
/// Cloning yields a fully independent copy, which is what `q` relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub ctm: Matrix,
    pub line_width: f64,
    pub line_cap_style: LineCapStyle,
    pub line_join_style: LineJoinStyle,
    pub miter_limit: f64,
    pub line_dash_pattern: DashPattern,
    pub rendering_intent: RenderingIntent,
    pub stroke_adjustment: bool,
    pub blend_mode: BlendMode,
    /// Stroking alpha (`CA`).
    pub stroking_alpha: f64,
    /// Non-stroking alpha (`ca`).
    pub non_stroking_alpha: f64,
    /// Alpha source flag (`AIS`).
    pub alpha_source: bool,
    pub flatness: f64,
    pub smoothness: f64,
    pub stroking_color_space: ColorSpace,
    pub stroking_color: Color,
    pub non_stroking_color_space: ColorSpace,
    pub non_stroking_color: Color,
    pub text_state: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            line_width: 1.0,
            line_cap_style: LineCapStyle::default(),
            line_join_style: LineJoinStyle::default(),
            miter_limit: 10.0,
            line_dash_pattern: DashPattern::solid(),
            rendering_intent: RenderingIntent::default(),
            stroke_adjustment: false,
            blend_mode: BlendMode::Normal,
            stroking_alpha: 1.0,
            non_stroking_alpha: 1.0,
            alpha_source: false,
            flatness: 1.0,
            smoothness: 0.0,
            stroking_color_space: ColorSpace::DeviceGray,
            stroking_color: Color::black(),
            non_stroking_color_space: ColorSpace::DeviceGray,
            non_stroking_color: Color::black(),
            text_state: TextState::default(),
        }
    }
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-multiply `matrix` into the CTM (`cm`).
    pub fn concat_matrix(&mut self, matrix: &Matrix) {
        self.ctm = self.ctm.pre_multiply(matrix);
    }

    /// Install a color space for stroking and reset the color to its
    /// initial value.
    pub fn set_stroking_color_space(&mut self, space: ColorSpace) {
        self.stroking_color = space.initial_color();
        self.stroking_color_space = space;
    }

    pub fn set_non_stroking_color_space(&mut self, space: ColorSpace) {
        self.non_stroking_color = space.initial_color();
        self.non_stroking_color_space = space;
    }

    /// Apply the parameters of an external graphics state dictionary (`gs`).
    ///
    /// Recognized keys: `LW LC LJ ML D RI SA BM CA ca AIS TK FL SM Font`.
    /// Other keys are ignored. A recognized key with a value of the wrong
    /// shape is reported as [`ContentError::MalformedResource`] for `name`,
    /// and leaves the state untouched.
    pub fn apply_ext_gstate(&mut self, name: &str, params: &Dictionary) -> Result<()> {
        let mut updated = self.clone();
        updated.apply_entries(name, params)?;
        *self = updated;
        Ok(())
    }

    fn apply_entries(&mut self, name: &str, params: &Dictionary) -> Result<()> {
        let malformed = |key: &str, expected: &str| ContentError::MalformedResource {
            category: "ExtGState".to_string(),
            name: name.to_string(),
            reason: format!("/{key} must be {expected}"),
        };
        let number = |key: &str, value: &Operand| {
            value.as_f64().ok_or_else(|| malformed(key, "a number"))
        };
        let boolean = |key: &str, value: &Operand| {
            value.as_bool().ok_or_else(|| malformed(key, "a boolean"))
        };

        for (key, value) in params {
            let key = key.as_str();
            match key {
                "LW" => self.line_width = number(key, value)?,
                "LC" => {
                    self.line_cap_style = value
                        .as_i64()
                        .and_then(LineCapStyle::from_i64)
                        .ok_or_else(|| malformed(key, "a line cap style"))?;
                }
                "LJ" => {
                    self.line_join_style = value
                        .as_i64()
                        .and_then(LineJoinStyle::from_i64)
                        .ok_or_else(|| malformed(key, "a line join style"))?;
                }
                "ML" => self.miter_limit = number(key, value)?,
                "D" => {
                    self.line_dash_pattern = dash_pattern_from_array(value)
                        .ok_or_else(|| malformed(key, "[dash-array phase]"))?;
                }
                "RI" => {
                    self.rendering_intent = rendering_intent(value)
                        .ok_or_else(|| malformed(key, "a name or integer"))?;
                }
                "SA" => self.stroke_adjustment = boolean(key, value)?,
                "BM" => {
                    self.blend_mode = blend_mode(value)
                        .ok_or_else(|| malformed(key, "a name or array of names"))?;
                }
                "CA" => self.stroking_alpha = number(key, value)?,
                "ca" => self.non_stroking_alpha = number(key, value)?,
                "AIS" => self.alpha_source = boolean(key, value)?,
                "TK" => self.text_state.knockout = boolean(key, value)?,
                "FL" => self.flatness = number(key, value)?,
                "SM" => self.smoothness = number(key, value)?,
                "Font" => {
                    let (font, size) = font_entry(value)
                        .ok_or_else(|| malformed(key, "[font size]"))?;
                    self.text_state.set_font(font, size);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// An intent given by name, or by the integer value some producers write.
pub(crate) fn rendering_intent(value: &Operand) -> Option<RenderingIntent> {
    match value {
        Operand::Name(name) => Some(RenderingIntent::from_name(name)),
        Operand::Integer(code) => Some(RenderingIntent::Numeric(*code)),
        _ => None,
    }
}

/// Parse the `[dash-array phase]` form used by `/D`.
fn dash_pattern_from_array(value: &Operand) -> Option<DashPattern> {
    let [lengths, phase] = value.as_array()? else {
        return None;
    };
    let lengths = lengths
        .as_array()?
        .iter()
        .map(Operand::as_f64)
        .collect::<Option<Vec<_>>>()?;
    Some(DashPattern::new(lengths, phase.as_f64()?))
}

/// `/BM` is a name or an array of names; the first one recognized wins and
/// an array with no recognized entry falls back to `Normal`.
fn blend_mode(value: &Operand) -> Option<BlendMode> {
    match value {
        Operand::Name(name) => Some(BlendMode::from_name(name).unwrap_or_default()),
        Operand::Array(items) => Some(
            items
                .iter()
                .filter_map(Operand::as_name)
                .find_map(BlendMode::from_name)
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

/// `/Font [font size]`: the font is a resource name, or a font dictionary
/// whose `/BaseFont` is used.
fn font_entry(value: &Operand) -> Option<(&str, f64)> {
    let [font, size] = value.as_array()? else {
        return None;
    };
    let font = match font {
        Operand::Name(name) => name.as_str(),
        Operand::Dictionary(dict) => dict.get("BaseFont")?.as_name()?,
        _ => return None,
    };
    Some((font, size.as_f64()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary;

    #[test]
    fn defaults() {
        let gs = GraphicsState::new();
        assert_eq!(gs.line_width, 1.0);
        assert_eq!(gs.miter_limit, 10.0);
        assert!(gs.line_dash_pattern.is_solid());
        assert_eq!(gs.rendering_intent, RenderingIntent::RelativeColorimetric);
        assert_eq!(gs.blend_mode, BlendMode::Normal);
        assert_eq!(gs.stroking_alpha, 1.0);
        assert_eq!(gs.non_stroking_alpha, 1.0);
        assert_eq!(gs.stroking_color_space, ColorSpace::DeviceGray);
        assert_eq!(gs.non_stroking_color, Color::Gray(0.0));
        assert!(gs.ctm.is_identity());
    }

    #[test]
    fn clone_copies_nested_state() {
        let mut gs = GraphicsState::new();
        let saved = gs.clone();
        gs.text_state.leading = 14.0;
        gs.line_dash_pattern = DashPattern::new(vec![3.0], 0.0);
        assert_eq!(saved.text_state.leading, 0.0);
        assert!(saved.line_dash_pattern.is_solid());
    }

    #[test]
    fn concat_matrix_twice() {
        let mut gs = GraphicsState::new();
        gs.concat_matrix(&Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
        gs.concat_matrix(&Matrix::new(6.0, 5.0, 4.0, 3.0, 2.0, 1.0));
        assert_eq!(gs.ctm.to_array(), [21.0, 32.0, 13.0, 20.0, 10.0, 14.0]);
    }

    #[test]
    fn setting_color_space_resets_color() {
        let mut gs = GraphicsState::new();
        gs.non_stroking_color = Color::Gray(0.7);
        gs.set_non_stroking_color_space(ColorSpace::DeviceCMYK);
        assert_eq!(gs.non_stroking_color, Color::Cmyk(0.0, 0.0, 0.0, 1.0));
        gs.set_stroking_color_space(ColorSpace::DeviceRGB);
        assert_eq!(gs.stroking_color, Color::Rgb(0.0, 0.0, 0.0));
    }

    #[test]
    fn apply_ext_gstate_sets_recognized_keys() {
        let mut gs = GraphicsState::new();
        let params = dictionary! {
            "Type" => Operand::name("ExtGState"),
            "LW" => 10,
            "LC" => 2,
            "LJ" => 2,
            "ML" => 2,
            "D" => Operand::Array(vec![
                Operand::Array(vec![Operand::Integer(3), Operand::Integer(5)]),
                Operand::Integer(2),
            ]),
            "RI" => Operand::name("Saturation"),
            "SA" => true,
            "BM" => Operand::name("Multiply"),
            "CA" => 0.5,
            "ca" => 0.5,
            "AIS" => true,
            "TK" => false,
            "FL" => 4,
            "SM" => 0.1,
            "Font" => Operand::Array(vec![Operand::name("F1"), Operand::Integer(9)]),
        };
        gs.apply_ext_gstate("GS0", &params).unwrap();

        assert_eq!(gs.line_width, 10.0);
        assert_eq!(gs.line_cap_style, LineCapStyle::ProjectingSquare);
        assert_eq!(gs.line_join_style, LineJoinStyle::Bevel);
        assert_eq!(gs.miter_limit, 2.0);
        assert_eq!(gs.line_dash_pattern, DashPattern::new(vec![3.0, 5.0], 2.0));
        assert_eq!(gs.rendering_intent, RenderingIntent::Saturation);
        assert!(gs.stroke_adjustment);
        assert_eq!(gs.blend_mode, BlendMode::Multiply);
        assert_eq!(gs.stroking_alpha, 0.5);
        assert_eq!(gs.non_stroking_alpha, 0.5);
        assert!(gs.alpha_source);
        assert!(!gs.text_state.knockout);
        assert_eq!(gs.flatness, 4.0);
        assert_eq!(gs.smoothness, 0.1);
        assert_eq!(gs.text_state.font.as_deref(), Some("F1"));
        assert_eq!(gs.text_state.font_size, 9.0);
    }

    #[test]
    fn blend_mode_array_uses_first_recognized() {
        let mut gs = GraphicsState::new();
        let params = dictionary! {
            "BM" => Operand::Array(vec![Operand::name("Fancy"), Operand::name("Screen")]),
        };
        gs.apply_ext_gstate("GS0", &params).unwrap();
        assert_eq!(gs.blend_mode, BlendMode::Screen);
    }

    #[test]
    fn malformed_value_names_the_resource() {
        let mut gs = GraphicsState::new();
        let err = gs
            .apply_ext_gstate("GS1", &dictionary! { "LW" => Operand::name("wide") })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed resource /ExtGState /GS1: /LW must be a number"
        );
    }

    #[test]
    fn rendering_intent_accepts_names_and_integers() {
        let mut gs = GraphicsState::new();
        gs.apply_ext_gstate("GS0", &dictionary! { "RI" => 2 }).unwrap();
        assert_eq!(gs.rendering_intent, RenderingIntent::Numeric(2));
        gs.apply_ext_gstate("GS0", &dictionary! { "RI" => Operand::name("Vivid") })
            .unwrap();
        assert_eq!(gs.rendering_intent, RenderingIntent::Other("Vivid".to_string()));
        assert!(gs.apply_ext_gstate("GS0", &dictionary! { "RI" => 0.5 }).is_err());
    }

    #[test]
    fn failed_application_leaves_state_unchanged() {
        let mut gs = GraphicsState::new();
        gs.line_width = 3.0;
        let before = gs.clone();
        let params = dictionary! {
            "LW" => 10,
            "CA" => 0.25,
            "SA" => Operand::name("yes"),
            "BM" => Operand::name("Multiply"),
        };
        assert!(gs.apply_ext_gstate("GS0", &params).is_err());
        assert_eq!(gs, before);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut gs = GraphicsState::new();
        gs.apply_ext_gstate("GS0", &dictionary! { "OP" => true, "HT" => Operand::Null })
            .unwrap();
        assert_eq!(gs, GraphicsState::new());
    }
}
