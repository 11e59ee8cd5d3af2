//! pdfcontent-core: Backend-independent value types.
//!
//! This crate provides the geometry and painting types (Matrix, DashPattern,
//! line styles, Color, ...) that the content stream processor stores in its
//! graphics state. It has no required dependencies.

pub mod geometry;
pub mod painting;

pub use geometry::Matrix;
pub use painting::{
    BlendMode, Color, DashPattern, LineCapStyle, LineJoinStyle, RenderingIntent,
    TextRenderingMode,
};
