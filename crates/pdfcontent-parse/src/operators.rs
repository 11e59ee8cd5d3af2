//! Implementations of the built-in content stream operators.
//!
//! Each function here is the handler of one or more operators; the table
//! binding names to handlers lives in [`crate::registry`]. Composite text
//! operators (`TD`, `T*`, `'`, `"`) dispatch through
//! [`Processor::invoke`], so overrides installed on the processor are
//! honored.

use pdfcontent_core::geometry::Matrix;
use pdfcontent_core::painting::{
    Color, DashPattern, LineCapStyle, LineJoinStyle, TextRenderingMode,
};
use smol_str::SmolStr;

use crate::color_space::ColorSpace;
use crate::error::{ContentError, Result};
use crate::operand::Operand;
use crate::operator::{
    array_arg, bytes_arg, dict_arg, integer_arg, intent_arg, name_arg, number_arg, numbers_arg,
    numeric_operand,
};
use crate::processor::{GraphicsObject, MarkedContent, Processor};

// --- General graphics state: w J j M d ri i gs ---

pub(crate) fn set_line_width(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().line_width = number_arg("w", operands, 0)?;
    Ok(())
}

pub(crate) fn set_line_cap(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let value = integer_arg("J", operands, 0)?;
    p.graphics_state_mut().line_cap_style = LineCapStyle::from_i64(value).ok_or_else(|| {
        ContentError::invalid_operand("J", format!("unknown line cap style {value}"))
    })?;
    Ok(())
}

pub(crate) fn set_line_join(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let value = integer_arg("j", operands, 0)?;
    p.graphics_state_mut().line_join_style = LineJoinStyle::from_i64(value).ok_or_else(|| {
        ContentError::invalid_operand("j", format!("unknown line join style {value}"))
    })?;
    Ok(())
}

pub(crate) fn set_miter_limit(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().miter_limit = number_arg("M", operands, 0)?;
    Ok(())
}

pub(crate) fn set_line_dash_pattern(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let lengths = array_arg("d", operands, 0)?
        .iter()
        .map(|length| {
            length.as_f64().ok_or_else(|| {
                ContentError::invalid_operand(
                    "d",
                    format!("dash array entries must be numbers, got {}", length.kind()),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let phase = number_arg("d", operands, 1)?;
    p.graphics_state_mut().line_dash_pattern = DashPattern::new(lengths, phase);
    Ok(())
}

pub(crate) fn set_rendering_intent(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().rendering_intent = intent_arg("ri", operands, 0)?;
    Ok(())
}

pub(crate) fn set_flatness(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().flatness = number_arg("i", operands, 0)?;
    Ok(())
}

pub(crate) fn set_graphics_state_parameters(
    p: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    let name = name_arg("gs", operands, 0)?;
    let params = p.resources().ext_gstate(name)?;
    p.graphics_state_mut().apply_ext_gstate(name, &params)
}

// --- Special graphics state: q Q cm ---

pub(crate) fn save_graphics_state(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    p.state_mut().save_state();
    Ok(())
}

pub(crate) fn restore_graphics_state(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    if !p.state_mut().restore_state() {
        #[cfg(feature = "tracing")]
        tracing::warn!("unbalanced Q: no saved graphics state to restore");
    }
    Ok(())
}

pub(crate) fn concatenate_matrix(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let matrix = Matrix::from_array(numbers_arg::<6>("cm", operands)?);
    p.graphics_state_mut().concat_matrix(&matrix);
    Ok(())
}

// --- Path construction: m l c v y re h ---

fn begin_path<const N: usize>(p: &mut Processor<'_>, op: &str, operands: &[Operand]) -> Result<()> {
    numbers_arg::<N>(op, operands)?;
    p.set_graphics_object(GraphicsObject::Path);
    Ok(())
}

pub(crate) fn move_to(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<2>(p, "m", operands)
}

pub(crate) fn line_to(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<2>(p, "l", operands)
}

pub(crate) fn curve_to(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<6>(p, "c", operands)
}

pub(crate) fn curve_to_initial_replicated(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<4>(p, "v", operands)
}

pub(crate) fn curve_to_final_replicated(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<4>(p, "y", operands)
}

pub(crate) fn append_rectangle(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    begin_path::<4>(p, "re", operands)
}

pub(crate) fn close_subpath(_: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    Ok(())
}

// --- Path painting and clipping ---

/// `S s f F f* B B* b b* n`: end the path object.
pub(crate) fn end_path(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    p.set_graphics_object(GraphicsObject::None);
    Ok(())
}

/// `W W*`
pub(crate) fn clip_path(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    p.set_graphics_object(GraphicsObject::ClippingPath);
    Ok(())
}

// --- Text objects and text state ---

pub(crate) fn begin_text(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    p.set_graphics_object(GraphicsObject::Text);
    p.text_position_mut().begin();
    Ok(())
}

pub(crate) fn end_text(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    p.set_graphics_object(GraphicsObject::None);
    Ok(())
}

pub(crate) fn set_character_spacing(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().text_state.character_spacing = number_arg("Tc", operands, 0)?;
    Ok(())
}

pub(crate) fn set_word_spacing(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().text_state.word_spacing = number_arg("Tw", operands, 0)?;
    Ok(())
}

pub(crate) fn set_horizontal_scaling(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().text_state.horizontal_scaling = number_arg("Tz", operands, 0)?;
    Ok(())
}

pub(crate) fn set_leading(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().text_state.leading = number_arg("TL", operands, 0)?;
    Ok(())
}

pub(crate) fn set_font_and_size(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let font = name_arg("Tf", operands, 0)?;
    let size = number_arg("Tf", operands, 1)?;
    p.graphics_state_mut().text_state.set_font(font, size);
    Ok(())
}

pub(crate) fn set_text_rendering_mode(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let value = integer_arg("Tr", operands, 0)?;
    p.graphics_state_mut().text_state.rendering_mode = TextRenderingMode::from_i64(value)
        .ok_or_else(|| {
            ContentError::invalid_operand("Tr", format!("unknown text rendering mode {value}"))
        })?;
    Ok(())
}

pub(crate) fn set_text_rise(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    p.graphics_state_mut().text_state.rise = number_arg("Ts", operands, 0)?;
    Ok(())
}

// --- Text positioning: Td TD Tm T* ---

pub(crate) fn move_text(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let [tx, ty] = numbers_arg::<2>("Td", operands)?;
    p.text_position_mut().move_to_next_line(tx, ty);
    Ok(())
}

/// `TD`: `-ty TL` followed by `tx ty Td`.
pub(crate) fn move_text_and_set_leading(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let tx = numeric_operand("TD", operands, 0)?;
    let ty = numeric_operand("TD", operands, 1)?;
    p.invoke("TL", &[negate(ty)])?;
    p.invoke("Td", &[tx.clone(), ty.clone()])
}

pub(crate) fn set_text_matrix(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let matrix = Matrix::from_array(numbers_arg::<6>("Tm", operands)?);
    p.text_position_mut().set(matrix);
    Ok(())
}

/// `T*`: `0 -leading Td`.
pub(crate) fn move_to_next_line(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    let leading = p.graphics_state().text_state.leading;
    p.invoke("Td", &[Operand::Integer(0), Operand::Real(-leading)])
}

fn negate(value: &Operand) -> Operand {
    match value {
        Operand::Integer(i) => i
            .checked_neg()
            .map_or_else(|| Operand::Real(-(*i as f64)), Operand::Integer),
        other => Operand::Real(-other.as_f64().unwrap_or_default()),
    }
}

// --- Text showing: Tj TJ ' " ---

pub(crate) fn show_text(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    bytes_arg("Tj", operands, 0)?;
    Ok(())
}

pub(crate) fn show_text_with_positioning(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    for element in array_arg("TJ", operands, 0)? {
        if element.as_bytes().is_none() && !element.is_number() {
            return Err(ContentError::invalid_operand(
                "TJ",
                format!("array entries must be strings or numbers, got {}", element.kind()),
            ));
        }
    }
    Ok(())
}

/// `'`: `T*` followed by `string Tj`.
pub(crate) fn move_and_show_text(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    bytes_arg("'", operands, 0)?;
    p.invoke("T*", &[])?;
    p.invoke("Tj", &operands[..1])
}

/// `"`: `aw Tw`, `ac Tc`, then `string '`.
pub(crate) fn set_spacing_move_and_show_text(
    p: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    let word_spacing = numeric_operand("\"", operands, 0)?;
    let char_spacing = numeric_operand("\"", operands, 1)?;
    bytes_arg("\"", operands, 2)?;
    p.invoke("Tw", std::slice::from_ref(word_spacing))?;
    p.invoke("Tc", std::slice::from_ref(char_spacing))?;
    p.invoke("'", &operands[2..3])
}

// --- Type 3 glyph metrics: d0 d1 ---

pub(crate) fn set_glyph_width(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    numbers_arg::<2>("d0", operands)?;
    Ok(())
}

pub(crate) fn set_glyph_width_and_bounding_box(
    _: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    numbers_arg::<6>("d1", operands)?;
    Ok(())
}

// --- Color: CS cs SC SCN sc scn G g RG rg K k ---

pub(crate) fn set_stroking_color_space(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let space = p.resources().color_space(name_arg("CS", operands, 0)?)?;
    p.graphics_state_mut().set_stroking_color_space(space);
    Ok(())
}

pub(crate) fn set_non_stroking_color_space(
    p: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    let space = p.resources().color_space(name_arg("cs", operands, 0)?)?;
    p.graphics_state_mut().set_non_stroking_color_space(space);
    Ok(())
}

/// `SC SCN`: interpret the operands in the current stroking color space.
pub(crate) fn set_stroking_color(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let color = p.graphics_state().stroking_color_space.color(operands)?;
    p.graphics_state_mut().stroking_color = color;
    Ok(())
}

/// `sc scn`
pub(crate) fn set_non_stroking_color(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let color = p.graphics_state().non_stroking_color_space.color(operands)?;
    p.graphics_state_mut().non_stroking_color = color;
    Ok(())
}

/// Color for the device-space shortcuts, validated against the operator.
fn device_color(op: &str, space: &ColorSpace, operands: &[Operand]) -> Result<Color> {
    let n = space.num_components();
    for index in 0..n {
        numeric_operand(op, operands, index)?;
    }
    space.color(&operands[..n])
}

fn set_stroking_device(
    p: &mut Processor<'_>,
    op: &str,
    space: ColorSpace,
    operands: &[Operand],
) -> Result<()> {
    let color = device_color(op, &space, operands)?;
    let gs = p.graphics_state_mut();
    gs.stroking_color_space = space;
    gs.stroking_color = color;
    Ok(())
}

fn set_non_stroking_device(
    p: &mut Processor<'_>,
    op: &str,
    space: ColorSpace,
    operands: &[Operand],
) -> Result<()> {
    let color = device_color(op, &space, operands)?;
    let gs = p.graphics_state_mut();
    gs.non_stroking_color_space = space;
    gs.non_stroking_color = color;
    Ok(())
}

pub(crate) fn set_stroking_gray(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_stroking_device(p, "G", ColorSpace::DeviceGray, operands)
}

pub(crate) fn set_non_stroking_gray(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_non_stroking_device(p, "g", ColorSpace::DeviceGray, operands)
}

pub(crate) fn set_stroking_rgb(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_stroking_device(p, "RG", ColorSpace::DeviceRGB, operands)
}

pub(crate) fn set_non_stroking_rgb(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_non_stroking_device(p, "rg", ColorSpace::DeviceRGB, operands)
}

pub(crate) fn set_stroking_cmyk(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_stroking_device(p, "K", ColorSpace::DeviceCMYK, operands)
}

pub(crate) fn set_non_stroking_cmyk(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    set_non_stroking_device(p, "k", ColorSpace::DeviceCMYK, operands)
}

// --- Shading, XObjects, inline images ---

pub(crate) fn paint_shading(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    name_arg("sh", operands, 0)?;
    Ok(())
}

pub(crate) fn paint_xobject(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    name_arg("Do", operands, 0)?;
    Ok(())
}

/// `BI`: operands are the image dictionary and the raw image data.
pub(crate) fn inline_image(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    dict_arg("BI", operands, 0)?;
    bytes_arg("BI", operands, 1)?;
    Ok(())
}

// --- Marked content: MP DP BMC BDC EMC ---

/// Properties of `DP`/`BDC`: an inline dictionary or a `/Properties`
/// resource name. Returns the MCID of an inline dictionary.
fn property_list(op: &str, operands: &[Operand]) -> Result<Option<i64>> {
    match operands.get(1) {
        Some(Operand::Dictionary(dict)) => Ok(dict.get("MCID").and_then(Operand::as_i64)),
        Some(Operand::Name(_)) => Ok(None),
        Some(other) => Err(ContentError::invalid_operand(
            op,
            format!("operand 2 must be a dictionary or a name, got {}", other.kind()),
        )),
        None => Err(ContentError::invalid_operand(op, "missing operand 2")),
    }
}

pub(crate) fn marked_content_point(_: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    name_arg("MP", operands, 0)?;
    Ok(())
}

pub(crate) fn marked_content_point_with_properties(
    _: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    name_arg("DP", operands, 0)?;
    property_list("DP", operands)?;
    Ok(())
}

pub(crate) fn begin_marked_content(p: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
    let tag = SmolStr::new(name_arg("BMC", operands, 0)?);
    p.begin_marked_content(MarkedContent { tag, mcid: None });
    Ok(())
}

pub(crate) fn begin_marked_content_with_properties(
    p: &mut Processor<'_>,
    operands: &[Operand],
) -> Result<()> {
    let tag = SmolStr::new(name_arg("BDC", operands, 0)?);
    let mcid = property_list("BDC", operands)?;
    p.begin_marked_content(MarkedContent { tag, mcid });
    Ok(())
}

pub(crate) fn end_marked_content(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    if p.end_marked_content().is_none() {
        #[cfg(feature = "tracing")]
        tracing::warn!("unbalanced EMC: no open marked-content sequence");
    }
    Ok(())
}

// --- Compatibility: BX EX ---

pub(crate) fn begin_compatibility(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    let depth = p.compatibility_depth();
    p.set_compatibility_depth(depth + 1);
    Ok(())
}

pub(crate) fn end_compatibility(p: &mut Processor<'_>, _: &[Operand]) -> Result<()> {
    let depth = p.compatibility_depth();
    p.set_compatibility_depth(depth.saturating_sub(1));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary;
    use crate::resources::ResourceDictionary;
    use pdfcontent_core::painting::RenderingIntent;

    fn invoke(p: &mut Processor<'_>, name: &str, operands: &[Operand]) {
        p.invoke(name, operands).unwrap();
    }

    #[test]
    fn line_parameters() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "w", &[Operand::Real(2.5)]);
        invoke(&mut p, "J", &[Operand::Integer(1)]);
        invoke(&mut p, "j", &[Operand::Integer(2)]);
        invoke(&mut p, "M", &[Operand::Integer(4)]);
        invoke(&mut p, "i", &[Operand::Integer(3)]);
        invoke(&mut p, "ri", &[Operand::name("Perceptual")]);
        let gs = p.graphics_state();
        assert_eq!(gs.line_width, 2.5);
        assert_eq!(gs.line_cap_style, LineCapStyle::Round);
        assert_eq!(gs.line_join_style, LineJoinStyle::Bevel);
        assert_eq!(gs.miter_limit, 4.0);
        assert_eq!(gs.flatness, 3.0);
        assert_eq!(gs.rendering_intent, RenderingIntent::Perceptual);
    }

    #[test]
    fn rendering_intent_operand_forms() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "ri", &[Operand::Integer(1)]);
        assert_eq!(p.graphics_state().rendering_intent, RenderingIntent::Numeric(1));
        assert!(matches!(
            p.invoke("ri", &[Operand::string("Perceptual")]),
            Err(ContentError::InvalidOperand { .. })
        ));
        assert_eq!(p.graphics_state().rendering_intent, RenderingIntent::Numeric(1));
    }

    #[test]
    fn invalid_line_cap_is_rejected() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        assert!(matches!(
            p.invoke("J", &[Operand::Integer(7)]),
            Err(ContentError::InvalidOperand { .. })
        ));
        assert!(p.invoke("w", &[]).is_err());
        assert!(p.invoke("w", &[Operand::name("x")]).is_err());
    }

    #[test]
    fn dash_pattern_is_structurally_equal() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(
            &mut p,
            "d",
            &[
                Operand::Array(vec![Operand::Integer(3), Operand::Integer(4)]),
                Operand::Integer(5),
            ],
        );
        let dash = &p.graphics_state().line_dash_pattern;
        assert_eq!(dash, &DashPattern::new(vec![3.0, 4.0], 5.0));
        assert_ne!(dash, &DashPattern::new(vec![3.0, 4.0], 6.0));
    }

    #[test]
    fn dash_pattern_rejects_non_numeric_entries() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        let err = p
            .invoke(
                "d",
                &[Operand::Array(vec![Operand::name("x")]), Operand::Integer(0)],
            )
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidOperand { .. }));
    }

    #[test]
    fn text_state_operators() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "Tc", &[Operand::Real(0.5)]);
        invoke(&mut p, "Tw", &[Operand::Integer(2)]);
        invoke(&mut p, "Tz", &[Operand::Integer(80)]);
        invoke(&mut p, "TL", &[Operand::Integer(14)]);
        invoke(&mut p, "Tf", &[Operand::name("F1"), Operand::Integer(12)]);
        invoke(&mut p, "Tr", &[Operand::Integer(3)]);
        invoke(&mut p, "Ts", &[Operand::Real(-1.5)]);
        let ts = &p.graphics_state().text_state;
        assert_eq!(ts.character_spacing, 0.5);
        assert_eq!(ts.word_spacing, 2.0);
        assert_eq!(ts.horizontal_scaling, 80.0);
        assert_eq!(ts.leading, 14.0);
        assert_eq!(ts.font.as_deref(), Some("F1"));
        assert_eq!(ts.font_size, 12.0);
        assert_eq!(ts.rendering_mode, TextRenderingMode::Invisible);
        assert_eq!(ts.rise, -1.5);
    }

    #[test]
    fn text_positioning() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "BT", &[]);
        invoke(
            &mut p,
            "Tm",
            &[1, 0, 0, 1, 100, 700].map(Operand::from),
        );
        invoke(&mut p, "TD", &[Operand::Integer(0), Operand::Integer(-14)]);
        assert_eq!(p.graphics_state().text_state.leading, 14.0);
        assert_eq!(p.text_position().line_matrix, Matrix::translation(100.0, 686.0));
        invoke(&mut p, "T*", &[]);
        assert_eq!(p.text_position().text_matrix, Matrix::translation(100.0, 672.0));
        invoke(&mut p, "'", &[Operand::string("x")]);
        assert_eq!(p.text_position().text_matrix, Matrix::translation(100.0, 658.0));
        invoke(
            &mut p,
            "\"",
            &[Operand::Integer(1), Operand::Real(0.25), Operand::string("y")],
        );
        let ts = &p.graphics_state().text_state;
        assert_eq!((ts.word_spacing, ts.character_spacing), (1.0, 0.25));
        assert_eq!(p.text_position().text_matrix, Matrix::translation(100.0, 644.0));
    }

    #[test]
    fn text_showing_validates_operands() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "Tj", &[Operand::HexString(vec![0x41])]);
        invoke(
            &mut p,
            "TJ",
            &[Operand::Array(vec![Operand::string("a"), Operand::Integer(-20)])],
        );
        assert!(p.invoke("Tj", &[Operand::Integer(1)]).is_err());
        assert!(p
            .invoke("TJ", &[Operand::Array(vec![Operand::name("x")])])
            .is_err());
        assert!(p.invoke("'", &[]).is_err());
        assert!(p.invoke("\"", &[Operand::Integer(1), Operand::string("x")]).is_err());
    }

    #[test]
    fn negate_keeps_integer_type() {
        assert_eq!(negate(&Operand::Integer(4)), Operand::Integer(-4));
        assert_eq!(negate(&Operand::Real(1.78)), Operand::Real(-1.78));
        assert_eq!(negate(&Operand::Integer(i64::MIN)), Operand::Real(9.223372036854776e18));
    }

    #[test]
    fn device_color_operators_install_space() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "RG", &[Operand::Real(0.1), Operand::Real(0.2), Operand::Real(0.3)]);
        invoke(&mut p, "k", &[0, 0, 0, 1].map(Operand::from));
        let gs = p.graphics_state();
        assert_eq!(gs.stroking_color_space, ColorSpace::DeviceRGB);
        assert_eq!(gs.stroking_color, Color::Rgb(0.1, 0.2, 0.3));
        assert_eq!(gs.non_stroking_color_space, ColorSpace::DeviceCMYK);
        assert_eq!(gs.non_stroking_color, Color::Cmyk(0.0, 0.0, 0.0, 1.0));

        invoke(&mut p, "G", &[Operand::Real(0.5)]);
        invoke(&mut p, "g", &[Operand::Integer(1)]);
        assert_eq!(p.graphics_state().stroking_color, Color::Gray(0.5));
        assert_eq!(p.graphics_state().non_stroking_color_space, ColorSpace::DeviceGray);

        let err = p.invoke("rg", &[Operand::Integer(1)]).unwrap_err();
        assert_eq!(err.to_string(), "invalid operand for 'rg': missing operand 2");
    }

    #[test]
    fn generic_color_uses_installed_space() {
        let res = ResourceDictionary::new(dictionary! {
            "ColorSpace" => dictionary! {
                "CS0" => Operand::Array(vec![
                    Operand::name("Separation"),
                    Operand::name("Gold"),
                    Operand::name("DeviceCMYK"),
                    Operand::Null,
                ]),
            },
        });
        let mut p = Processor::new(&res);
        invoke(&mut p, "CS", &[Operand::name("CS0")]);
        assert_eq!(p.graphics_state().stroking_color, Color::Other(vec![1.0]));
        invoke(&mut p, "SCN", &[Operand::Real(0.3)]);
        assert_eq!(p.graphics_state().stroking_color, Color::Other(vec![0.3]));

        invoke(&mut p, "cs", &[Operand::name("DeviceRGB")]);
        invoke(&mut p, "sc", &[Operand::Integer(1), Operand::Integer(0), Operand::Integer(0)]);
        assert_eq!(p.graphics_state().non_stroking_color, Color::Rgb(1.0, 0.0, 0.0));

        invoke(&mut p, "cs", &[Operand::name("Pattern")]);
        invoke(&mut p, "scn", &[Operand::name("P0")]);
        assert_eq!(
            p.graphics_state().non_stroking_color,
            Color::Pattern {
                name: Some("P0".to_string()),
                components: vec![]
            }
        );
        assert!(matches!(
            p.invoke("CS", &[Operand::name("Missing")]),
            Err(ContentError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn type3_shading_xobject_and_inline_image_validate() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "d0", &[Operand::Integer(500), Operand::Integer(0)]);
        invoke(&mut p, "d1", &[500, 0, 0, 0, 400, 600].map(Operand::from));
        invoke(&mut p, "sh", &[Operand::name("Sh0")]);
        invoke(&mut p, "Do", &[Operand::name("Im1")]);
        invoke(
            &mut p,
            "BI",
            &[Operand::Dictionary(dictionary! { "W" => 1 }), Operand::string("x")],
        );
        assert!(p.invoke("d1", &[Operand::Integer(1)]).is_err());
        assert!(p.invoke("Do", &[Operand::string("Im1")]).is_err());
        assert!(p.invoke("BI", &[Operand::string("x")]).is_err());
        assert_eq!(p.graphics_state(), &crate::graphics_state::GraphicsState::default());
    }

    #[test]
    fn marked_content_properties() {
        let res = ResourceDictionary::default();
        let mut p = Processor::new(&res);
        invoke(&mut p, "MP", &[Operand::name("Tag")]);
        invoke(&mut p, "DP", &[Operand::name("Tag"), Operand::name("MC0")]);
        invoke(&mut p, "BDC", &[Operand::name("P"), Operand::name("MC0")]);
        assert_eq!(
            p.marked_content(),
            &[MarkedContent {
                tag: SmolStr::new("P"),
                mcid: None
            }]
        );
        assert!(p.invoke("BDC", &[Operand::name("P"), Operand::Integer(3)]).is_err());
        assert!(p.invoke("DP", &[Operand::name("P")]).is_err());
    }
}
