//! Serializer bridge: operand values to content stream tokens.
//!
//! [`OperandSerializer`] is the seam operators use when writing themselves
//! back out; [`Serializer`] is the default implementation of the token rules.

use crate::error::{ContentError, Result};
use crate::operand::{Operand, format_real};

/// Renders a single operand as its content stream token.
pub trait OperandSerializer {
    fn render(&self, operand: &Operand) -> Result<String>;
}

/// Default token writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl Serializer {
    pub fn new() -> Self {
        Self
    }
}

impl OperandSerializer for Serializer {
    fn render(&self, operand: &Operand) -> Result<String> {
        let mut out = String::new();
        write_operand(operand, &mut out)?;
        Ok(out)
    }
}

/// Append the token for `operand` to `out`.
pub(crate) fn write_operand(operand: &Operand, out: &mut String) -> Result<()> {
    match operand {
        Operand::Integer(i) => out.push_str(&i.to_string()),
        Operand::Real(r) => {
            if !r.is_finite() {
                return Err(ContentError::Serialize(format!(
                    "real number {r} has no content stream form"
                )));
            }
            out.push_str(&format_real(*r));
        }
        Operand::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Operand::Null => out.push_str("null"),
        Operand::Name(name) => write_name(name.as_bytes(), out),
        Operand::String(bytes) => write_literal_string(bytes, out),
        Operand::HexString(bytes) => {
            out.push('<');
            for b in bytes {
                out.push_str(&format!("{b:02x}"));
            }
            out.push('>');
        }
        Operand::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_operand(item, out)?;
            }
            out.push(']');
        }
        Operand::Dictionary(dict) => {
            out.push_str("<<");
            for (i, (key, value)) in dict.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_name(key.as_bytes(), out);
                out.push(' ');
                write_operand(value, out)?;
            }
            out.push_str(">>");
        }
    }
    Ok(())
}

fn write_name(name: &[u8], out: &mut String) {
    out.push('/');
    for &b in name {
        let needs_escape = !(b'!'..=b'~').contains(&b)
            || matches!(
                b,
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
            );
        if needs_escape {
            out.push_str(&format!("#{b:02X}"));
        } else {
            out.push(b as char);
        }
    }
}

/// Bytes outside printable ASCII (other than tab and newline) are written as
/// three-digit octal escapes so the output stays ASCII.
fn write_literal_string(bytes: &[u8], out: &mut String) {
    out.push('(');
    for &b in bytes {
        match b {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b'\r' => out.push_str("\\r"),
            b'\t' | b'\n' | b' '..=b'~' => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out.push(')');
}
