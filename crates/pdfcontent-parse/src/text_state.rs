//! Text state and text positioning.
//!
//! [`TextState`] holds the text parameters that belong to the graphics state
//! and are saved/restored by `q`/`Q` (PDF 32000-1 Table 104).
//! [`TextPosition`] holds the text matrix and text line matrix, which live
//! for the duration of a `BT`/`ET` text object and are not part of the
//! graphics state.

use pdfcontent_core::geometry::Matrix;
use pdfcontent_core::painting::TextRenderingMode;
use smol_str::SmolStr;

/// Text state parameters set by `Tc`, `Tw`, `Tz`, `TL`, `Tf`, `Tr`, `Ts`
/// and the `TK` entry of an external graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Character spacing (`Tc`).
    pub character_spacing: f64,
    /// Word spacing (`Tw`).
    pub word_spacing: f64,
    /// Horizontal scaling in percent (`Tz`), 100 = normal.
    pub horizontal_scaling: f64,
    /// Leading (`TL`), the baseline distance used by `T*`.
    pub leading: f64,
    /// Font resource name selected by `Tf`.
    pub font: Option<SmolStr>,
    pub font_size: f64,
    /// Rendering mode (`Tr`).
    pub rendering_mode: TextRenderingMode,
    /// Rise (`Ts`).
    pub rise: f64,
    /// Text knockout (`TK` in an ExtGState).
    pub knockout: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            character_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            rendering_mode: TextRenderingMode::default(),
            rise: 0.0,
            knockout: true,
        }
    }
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a font and size (`Tf`).
    pub fn set_font(&mut self, font: impl Into<SmolStr>, size: f64) {
        self.font = Some(font.into());
        self.font_size = size;
    }
}

/// Text matrix `Tm` and text line matrix `Tlm` of the current text object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextPosition {
    pub text_matrix: Matrix,
    pub line_matrix: Matrix,
}

impl TextPosition {
    /// Reset both matrices to identity, as `BT` does.
    pub fn begin(&mut self) {
        *self = Self::default();
    }

    /// Replace both matrices (`Tm`).
    pub fn set(&mut self, matrix: Matrix) {
        self.text_matrix = matrix;
        self.line_matrix = matrix;
    }

    /// Move to the start of the next line offset by `(tx, ty)` from the
    /// start of the current line (`Td`).
    pub fn move_to_next_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = self.line_matrix.pre_multiply(&Matrix::translation(tx, ty));
        self.text_matrix = self.line_matrix;
    }
}
