//! The operator abstraction and its serialization shapes.
//!
//! Every content stream operator has two orthogonal capabilities:
//! [`Operator::invoke`] applies it to a [`Processor`], and
//! [`Operator::serialize`] writes an invocation back out as content stream
//! text without touching any processor state.

use std::fmt;

use pdfcontent_core::painting::RenderingIntent;
use smol_str::SmolStr;

use crate::error::{ContentError, Result};
use crate::graphics_state::rendering_intent;
use crate::operand::{Dictionary, Operand};
use crate::processor::Processor;
use crate::serializer::OperandSerializer;

/// A named content stream operator.
///
/// Implementations hold no mutable state so a single instance can be shared
/// by every processor.
pub trait Operator: Send + Sync {
    fn name(&self) -> &str;

    /// Apply the operator to `processor`.
    fn invoke(&self, processor: &mut Processor<'_>, operands: &[Operand]) -> Result<()>;

    /// Write an invocation with `operands` as content stream bytes.
    ///
    /// The default writes every operand token followed by the operator name.
    fn serialize(&self, serializer: &dyn OperandSerializer, operands: &[Operand]) -> Result<Vec<u8>> {
        serialize_generic(self.name(), serializer, operands)
    }
}

/// How an operator writes itself out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializeShape {
    /// `op1 op2 ... name\n`, every operand rendered by the serializer.
    #[default]
    Generic,
    /// `name\n`; operands are ignored.
    NoOperands,
    /// `value name\n`, using the operand's own display form.
    SingleNumeric,
    /// `BI\n/Key value ... ID\n<data>EI\n`.
    InlineImage,
}

impl SerializeShape {
    pub fn serialize(
        self,
        name: &str,
        serializer: &dyn OperandSerializer,
        operands: &[Operand],
    ) -> Result<Vec<u8>> {
        match self {
            SerializeShape::Generic => serialize_generic(name, serializer, operands),
            SerializeShape::NoOperands => Ok(format!("{name}\n").into_bytes()),
            SerializeShape::SingleNumeric => serialize_single_numeric(name, operands),
            SerializeShape::InlineImage => serialize_inline_image(serializer, operands),
        }
    }
}

type Handler = dyn Fn(&mut Processor<'_>, &[Operand]) -> Result<()> + Send + Sync;

/// An operator built from a name, a serialization shape and a handler.
///
/// All built-in operators are of this type; tests and instrumentation use it
/// to install stand-ins with [`Processor::set_operator`].
pub struct ContentOperator {
    name: SmolStr,
    shape: SerializeShape,
    handler: Box<Handler>,
}

impl ContentOperator {
    pub fn new<F>(name: impl Into<SmolStr>, shape: SerializeShape, handler: F) -> Self
    where
        F: Fn(&mut Processor<'_>, &[Operand]) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            shape,
            handler: Box::new(handler),
        }
    }
}

impl Operator for ContentOperator {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, processor: &mut Processor<'_>, operands: &[Operand]) -> Result<()> {
        (self.handler)(processor, operands)
    }

    fn serialize(&self, serializer: &dyn OperandSerializer, operands: &[Operand]) -> Result<Vec<u8>> {
        self.shape.serialize(&self.name, serializer, operands)
    }
}

impl fmt::Debug for ContentOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentOperator")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

fn serialize_generic(
    name: &str,
    serializer: &dyn OperandSerializer,
    operands: &[Operand],
) -> Result<Vec<u8>> {
    let mut out = String::new();
    for operand in operands {
        out.push_str(&serializer.render(operand)?);
        out.push(' ');
    }
    out.push_str(name);
    out.push('\n');
    Ok(out.into_bytes())
}

fn serialize_single_numeric(name: &str, operands: &[Operand]) -> Result<Vec<u8>> {
    let value = operands
        .first()
        .ok_or_else(|| ContentError::invalid_operand(name, "missing operand 1"))?;
    if !value.is_number() {
        return Err(ContentError::invalid_operand(
            name,
            format!("expected a number, got {}", value.kind()),
        ));
    }
    if let Operand::Real(r) = value {
        if !r.is_finite() {
            return Err(ContentError::Serialize(format!(
                "real number {r} has no content stream form"
            )));
        }
    }
    Ok(format!("{value} {name}\n").into_bytes())
}

/// Operands are the image dictionary and the raw data. The data is copied
/// without any escaping.
fn serialize_inline_image(
    serializer: &dyn OperandSerializer,
    operands: &[Operand],
) -> Result<Vec<u8>> {
    let dict = dict_arg("BI", operands, 0)?;
    let data = bytes_arg("BI", operands, 1)?;

    let mut out = String::from("BI\n");
    for (key, value) in dict {
        out.push_str(&serializer.render(&Operand::Name(key.clone()))?);
        out.push(' ');
        out.push_str(&serializer.render(value)?);
        out.push(' ');
    }
    out.push_str("ID\n");

    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(b"EI\n");
    Ok(bytes)
}

// Operand extraction shared by all operators. Missing or mistyped operands
// are reported as `InvalidOperand`; extra trailing operands are ignored.

fn operand<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a Operand> {
    operands
        .get(index)
        .ok_or_else(|| ContentError::invalid_operand(op, format!("missing operand {}", index + 1)))
}

fn mistyped(op: &str, index: usize, expected: &str, found: &Operand) -> ContentError {
    ContentError::invalid_operand(
        op,
        format!("operand {} must be {expected}, got {}", index + 1, found.kind()),
    )
}

pub(crate) fn number_arg(op: &str, operands: &[Operand], index: usize) -> Result<f64> {
    let value = operand(op, operands, index)?;
    value.as_f64().ok_or_else(|| mistyped(op, index, "a number", value))
}

/// The first `N` operands as numbers.
pub(crate) fn numbers_arg<const N: usize>(op: &str, operands: &[Operand]) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for (index, slot) in values.iter_mut().enumerate() {
        *slot = number_arg(op, operands, index)?;
    }
    Ok(values)
}

pub(crate) fn integer_arg(op: &str, operands: &[Operand], index: usize) -> Result<i64> {
    let value = operand(op, operands, index)?;
    value.as_i64().ok_or_else(|| mistyped(op, index, "an integer", value))
}

pub(crate) fn name_arg<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a str> {
    let value = operand(op, operands, index)?;
    value.as_name().ok_or_else(|| mistyped(op, index, "a name", value))
}

pub(crate) fn bytes_arg<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a [u8]> {
    let value = operand(op, operands, index)?;
    value.as_bytes().ok_or_else(|| mistyped(op, index, "a string", value))
}

pub(crate) fn array_arg<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a [Operand]> {
    let value = operand(op, operands, index)?;
    value.as_array().ok_or_else(|| mistyped(op, index, "an array", value))
}

pub(crate) fn dict_arg<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a Dictionary> {
    let value = operand(op, operands, index)?;
    value.as_dict().ok_or_else(|| mistyped(op, index, "a dictionary", value))
}

pub(crate) fn intent_arg(op: &str, operands: &[Operand], index: usize) -> Result<RenderingIntent> {
    let value = operand(op, operands, index)?;
    rendering_intent(value).ok_or_else(|| mistyped(op, index, "a name or integer", value))
}

/// Return the operand at `index`, checking that it is a number.
pub(crate) fn numeric_operand<'a>(op: &str, operands: &'a [Operand], index: usize) -> Result<&'a Operand> {
    let value = operand(op, operands, index)?;
    if value.is_number() {
        Ok(value)
    } else {
        Err(mistyped(op, index, "a number", value))
    }
}
