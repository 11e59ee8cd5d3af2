use std::path::Path;

use pdfcontent_core::geometry::Matrix;
use pdfcontent_core::painting::Color;
use pdfcontent_parse::{ContentOperation, LopdfDocument, Processor, tokenize};

use crate::page_range::parse_page_range;

/// Install the `log` backend that receives the parser's tracing events.
///
/// `verbose` raises the default level from `warn`; `RUST_LOG` still wins.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Read a whole input file, reporting a missing file the same way for every
/// subcommand.
pub fn read_input(file: &Path) -> Result<Vec<u8>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    std::fs::read(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })
}

/// Read and tokenize a raw content stream file.
pub fn read_operations(file: &Path) -> Result<Vec<ContentOperation>, i32> {
    let bytes = read_input(file)?;
    tokenize(&bytes).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Open a PDF file with user-friendly error messages.
pub fn open_pdf(file: &Path) -> Result<LopdfDocument, i32> {
    let bytes = read_input(file)?;
    LopdfDocument::load_mem(&bytes).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// `None` selects every page.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

pub fn matrix_str(m: &Matrix) -> String {
    m.to_array()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn color_str(color: &Color) -> String {
    let join = |values: &[f64]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    match color {
        Color::Gray(g) => format!("gray {g}"),
        Color::Rgb(r, g, b) => format!("rgb {}", join(&[*r, *g, *b])),
        Color::Cmyk(c, m, y, k) => format!("cmyk {}", join(&[*c, *m, *y, *k])),
        Color::Other(values) => format!("components {}", join(values)),
        Color::Pattern { name, components } => match name {
            Some(name) => format!("pattern /{name} {}", join(components))
                .trim_end()
                .to_string(),
            None => format!("pattern {}", join(components)).trim_end().to_string(),
        },
    }
}

/// The processor's final state as `key: value` lines.
pub fn state_lines(processor: &Processor<'_>) -> Vec<String> {
    let gs = processor.graphics_state();
    let ts = &gs.text_state;
    let dash = &gs.line_dash_pattern;
    vec![
        format!("graphics_object: {}", processor.graphics_object().name()),
        format!("stack_depth: {}", processor.state().stack_depth()),
        format!("ctm: {}", matrix_str(&gs.ctm)),
        format!("line_width: {}", gs.line_width),
        format!("line_cap: {:?}", gs.line_cap_style),
        format!("line_join: {:?}", gs.line_join_style),
        format!("miter_limit: {}", gs.miter_limit),
        format!(
            "dash: [{}] {}",
            dash.dash_array
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            dash.dash_phase
        ),
        format!("rendering_intent: {}", gs.rendering_intent),
        format!("blend_mode: {:?}", gs.blend_mode),
        format!("alpha: {} {}", gs.stroking_alpha, gs.non_stroking_alpha),
        format!(
            "stroke: {} {}",
            gs.stroking_color_space.family(),
            color_str(&gs.stroking_color)
        ),
        format!(
            "fill: {} {}",
            gs.non_stroking_color_space.family(),
            color_str(&gs.non_stroking_color)
        ),
        format!(
            "font: {} {}",
            ts.font.as_deref().map_or("-".to_string(), |f| format!("/{f}")),
            ts.font_size
        ),
        format!("leading: {}", ts.leading),
        format!("text_matrix: {}", matrix_str(&processor.text_position().text_matrix)),
    ]
}

/// The processor's final state as a JSON object.
pub fn state_json(processor: &Processor<'_>) -> serde_json::Value {
    let gs = processor.graphics_state();
    let ts = &gs.text_state;
    serde_json::json!({
        "graphics_object": processor.graphics_object().name(),
        "stack_depth": processor.state().stack_depth(),
        "ctm": gs.ctm.to_array(),
        "line_width": gs.line_width,
        "line_cap": gs.line_cap_style,
        "line_join": gs.line_join_style,
        "miter_limit": gs.miter_limit,
        "dash": gs.line_dash_pattern,
        "rendering_intent": gs.rendering_intent,
        "blend_mode": gs.blend_mode,
        "stroking_alpha": gs.stroking_alpha,
        "non_stroking_alpha": gs.non_stroking_alpha,
        "stroking_color_space": gs.stroking_color_space.family(),
        "stroking_color": gs.stroking_color,
        "non_stroking_color_space": gs.non_stroking_color_space.family(),
        "non_stroking_color": gs.non_stroking_color,
        "font": ts.font.as_deref(),
        "font_size": ts.font_size,
        "leading": ts.leading,
        "rendering_mode": ts.rendering_mode,
        "text_matrix": processor.text_position().text_matrix.to_array(),
    })
}
