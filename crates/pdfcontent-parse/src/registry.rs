//! The default operator registry.
//!
//! Built once on first use and shared read-only by every [`Processor`].
//!
//! [`Processor`]: crate::processor::Processor

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use smol_str::SmolStr;

use crate::operator::{ContentOperator, Operator, SerializeShape};
use crate::operators::*;

/// Operator name to implementation.
pub type OperatorMap = HashMap<SmolStr, Arc<dyn Operator>>;

static DEFAULT_OPERATORS: LazyLock<OperatorMap> = LazyLock::new(build_default);

/// The shared default registry.
pub fn default_operators() -> &'static OperatorMap {
    &DEFAULT_OPERATORS
}

/// Build a fresh mapping of every built-in operator.
pub fn build_default() -> OperatorMap {
    use SerializeShape::{Generic, InlineImage, NoOperands, SingleNumeric};

    let operators = [
        // General graphics state
        ContentOperator::new("w", SingleNumeric, set_line_width),
        ContentOperator::new("J", SingleNumeric, set_line_cap),
        ContentOperator::new("j", SingleNumeric, set_line_join),
        ContentOperator::new("M", SingleNumeric, set_miter_limit),
        ContentOperator::new("d", Generic, set_line_dash_pattern),
        ContentOperator::new("ri", Generic, set_rendering_intent),
        ContentOperator::new("i", SingleNumeric, set_flatness),
        ContentOperator::new("gs", Generic, set_graphics_state_parameters),
        // Special graphics state
        ContentOperator::new("q", NoOperands, save_graphics_state),
        ContentOperator::new("Q", NoOperands, restore_graphics_state),
        ContentOperator::new("cm", Generic, concatenate_matrix),
        // Path construction
        ContentOperator::new("m", Generic, move_to),
        ContentOperator::new("l", Generic, line_to),
        ContentOperator::new("c", Generic, curve_to),
        ContentOperator::new("v", Generic, curve_to_initial_replicated),
        ContentOperator::new("y", Generic, curve_to_final_replicated),
        ContentOperator::new("h", NoOperands, close_subpath),
        ContentOperator::new("re", Generic, append_rectangle),
        // Path painting
        ContentOperator::new("S", NoOperands, end_path),
        ContentOperator::new("s", NoOperands, end_path),
        ContentOperator::new("f", NoOperands, end_path),
        ContentOperator::new("F", NoOperands, end_path),
        ContentOperator::new("f*", NoOperands, end_path),
        ContentOperator::new("B", NoOperands, end_path),
        ContentOperator::new("B*", NoOperands, end_path),
        ContentOperator::new("b", NoOperands, end_path),
        ContentOperator::new("b*", NoOperands, end_path),
        ContentOperator::new("n", NoOperands, end_path),
        // Clipping paths
        ContentOperator::new("W", NoOperands, clip_path),
        ContentOperator::new("W*", NoOperands, clip_path),
        // Text objects
        ContentOperator::new("BT", NoOperands, begin_text),
        ContentOperator::new("ET", NoOperands, end_text),
        // Text state
        ContentOperator::new("Tc", SingleNumeric, set_character_spacing),
        ContentOperator::new("Tw", SingleNumeric, set_word_spacing),
        ContentOperator::new("Tz", SingleNumeric, set_horizontal_scaling),
        ContentOperator::new("TL", SingleNumeric, set_leading),
        ContentOperator::new("Tf", Generic, set_font_and_size),
        ContentOperator::new("Tr", SingleNumeric, set_text_rendering_mode),
        ContentOperator::new("Ts", SingleNumeric, set_text_rise),
        // Text positioning
        ContentOperator::new("Td", Generic, move_text),
        ContentOperator::new("TD", Generic, move_text_and_set_leading),
        ContentOperator::new("Tm", Generic, set_text_matrix),
        ContentOperator::new("T*", NoOperands, move_to_next_line),
        // Text showing
        ContentOperator::new("Tj", Generic, show_text),
        ContentOperator::new("TJ", Generic, show_text_with_positioning),
        ContentOperator::new("'", Generic, move_and_show_text),
        ContentOperator::new("\"", Generic, set_spacing_move_and_show_text),
        // Type 3 fonts
        ContentOperator::new("d0", Generic, set_glyph_width),
        ContentOperator::new("d1", Generic, set_glyph_width_and_bounding_box),
        // Color
        ContentOperator::new("CS", Generic, set_stroking_color_space),
        ContentOperator::new("cs", Generic, set_non_stroking_color_space),
        ContentOperator::new("SC", Generic, set_stroking_color),
        ContentOperator::new("SCN", Generic, set_stroking_color),
        ContentOperator::new("sc", Generic, set_non_stroking_color),
        ContentOperator::new("scn", Generic, set_non_stroking_color),
        ContentOperator::new("G", SingleNumeric, set_stroking_gray),
        ContentOperator::new("g", SingleNumeric, set_non_stroking_gray),
        ContentOperator::new("RG", Generic, set_stroking_rgb),
        ContentOperator::new("rg", Generic, set_non_stroking_rgb),
        ContentOperator::new("K", Generic, set_stroking_cmyk),
        ContentOperator::new("k", Generic, set_non_stroking_cmyk),
        // Shading, XObjects and inline images
        ContentOperator::new("sh", Generic, paint_shading),
        ContentOperator::new("Do", Generic, paint_xobject),
        ContentOperator::new("BI", InlineImage, inline_image),
        // Marked content
        ContentOperator::new("MP", Generic, marked_content_point),
        ContentOperator::new("DP", Generic, marked_content_point_with_properties),
        ContentOperator::new("BMC", Generic, begin_marked_content),
        ContentOperator::new("BDC", Generic, begin_marked_content_with_properties),
        ContentOperator::new("EMC", NoOperands, end_marked_content),
        // Compatibility
        ContentOperator::new("BX", NoOperands, begin_compatibility),
        ContentOperator::new("EX", NoOperands, end_compatibility),
    ];

    operators
        .into_iter()
        .map(|op| {
            let name = SmolStr::new(op.name());
            (name, Arc::new(op) as Arc<dyn Operator>)
        })
        .collect()
}
