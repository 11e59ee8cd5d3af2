//! pdfcontent-parse: PDF content stream operators, graphics state and
//! serialization.
//!
//! A [`Processor`] feeds `(operator, operands)` pairs to the operators of the
//! default [`registry`], maintaining a [`GraphicsState`] stack and the
//! graphics-object state machine. Every [`Operator`] can also write an
//! invocation back out through an [`OperandSerializer`]. The [`tokenizer`]
//! reads raw content stream bytes and [`lopdf_backend`] supplies page content
//! and resources from a PDF file.

pub mod color_space;
pub mod error;
pub mod graphics_state;
pub mod interpreter_state;
pub mod lopdf_backend;
pub mod operand;
pub mod operator;
mod operators;
pub mod processor;
pub mod registry;
pub mod resources;
pub mod serializer;
pub mod text_state;
pub mod tokenizer;

pub use color_space::ColorSpace;
pub use error::{ContentError, Result};
pub use graphics_state::GraphicsState;
pub use interpreter_state::InterpreterState;
pub use lopdf_backend::{LopdfDocument, LopdfResources};
pub use operand::{ContentOperation, Dictionary, Operand};
pub use operator::{ContentOperator, Operator, SerializeShape};
pub use processor::{GraphicsObject, MarkedContent, Processor};
pub use registry::{OperatorMap, build_default, default_operators};
pub use resources::{ResourceDictionary, Resources};
pub use serializer::{OperandSerializer, Serializer};
pub use smol_str::SmolStr;
pub use text_state::{TextPosition, TextState};
pub use tokenizer::tokenize;
pub use pdfcontent_core;

/// Serialize `operations` with the default operators and `serializer`,
/// concatenating the output.
///
/// Operations whose operator is unknown are written in the generic shape.
pub fn serialize_operations(
    operations: &[ContentOperation],
    serializer: &dyn OperandSerializer,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for op in operations {
        let bytes = match default_operators().get(op.name.as_str()) {
            Some(operator) => operator.serialize(serializer, &op.operands)?,
            None => SerializeShape::Generic.serialize(&op.name, serializer, &op.operands)?,
        };
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_operations_round_trips_through_tokenizer() {
        let source = b"q 1 0 0 1 72 72 cm BT /F1 12 Tf (Hi) Tj ET Q";
        let ops = tokenize(source).unwrap();
        let out = serialize_operations(&ops, &Serializer::new()).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "q\n1 0 0 1 72 72 cm\nBT\n/F1 12 Tf\n(Hi) Tj\nET\nQ\n"
        );
        assert_eq!(tokenize(&out).unwrap(), ops);
    }

    #[test]
    fn serialize_unknown_operator_generically() {
        let ops = vec![ContentOperation::new("zz", vec![Operand::Integer(1)])];
        assert_eq!(serialize_operations(&ops, &Serializer::new()).unwrap(), b"1 zz\n");
    }
}
