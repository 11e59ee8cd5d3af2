//! Operand values of a content stream.
//!
//! An [`Operand`] is one of the object kinds that may precede an operator in a
//! content stream. A [`ContentOperation`] pairs an operator name with the
//! operands collected before it.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Insertion-ordered dictionary operand.
///
/// Key order is significant: inline image dictionaries are written back in
/// the order they were given.
pub type Dictionary = IndexMap<SmolStr, Operand>;

/// A PDF content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real number (e.g., `3.14`, `.5`).
    Real(f64),
    /// Boolean value (`true` or `false`).
    Boolean(bool),
    /// Name object (e.g., `/F1`), stored without the leading `/`.
    Name(SmolStr),
    /// Literal string, stored as raw bytes.
    String(Vec<u8>),
    /// Hexadecimal string, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands.
    Array(Vec<Operand>),
    /// Dictionary of operands.
    Dictionary(Dictionary),
    /// The null object.
    Null,
}

impl Operand {
    /// Build a name operand.
    pub fn name(name: impl Into<SmolStr>) -> Self {
        Operand::Name(name.into())
    }

    /// Build a literal string operand.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Operand::String(bytes.into())
    }

    /// Numeric value of an integer or real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer value. Reals are accepted only when they have no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Operand::Integer(i) => Some(*i),
            Operand::Real(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Operand::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n.as_str()),
            _ => None,
        }
    }

    /// Bytes of a literal or hex string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::String(s) | Operand::HexString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Operand]> {
        match self {
            Operand::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Operand::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Operand::Integer(_) | Operand::Real(_))
    }

    /// Short type label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Integer(_) => "integer",
            Operand::Real(_) => "real",
            Operand::Boolean(_) => "boolean",
            Operand::Name(_) => "name",
            Operand::String(_) | Operand::HexString(_) => "string",
            Operand::Array(_) => "array",
            Operand::Dictionary(_) => "dictionary",
            Operand::Null => "null",
        }
    }
}

/// Format a real in shortest round-trip form, never in exponent notation and
/// always with a fractional part (`5.0`, `5.45`, `0.00001`).
pub(crate) fn format_real(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl fmt::Display for Operand {
    /// The operand's own display form. Numbers print as themselves; every
    /// other kind prints as its content stream token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Integer(i) => write!(f, "{i}"),
            Operand::Real(r) => f.write_str(&format_real(*r)),
            other => {
                let mut token = String::new();
                crate::serializer::write_operand(other, &mut token).map_err(|_| fmt::Error)?;
                f.write_str(&token)
            }
        }
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Integer(value.into())
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Integer(value)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Real(value)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Boolean(value)
    }
}

impl From<Vec<Operand>> for Operand {
    fn from(items: Vec<Operand>) -> Self {
        Operand::Array(items)
    }
}

impl From<Dictionary> for Operand {
    fn from(dict: Dictionary) -> Self {
        Operand::Dictionary(dict)
    }
}

/// Build a [`Dictionary`] from `key => value` pairs, keeping their order.
///
/// ```
/// use pdfcontent_parse::{dictionary, Operand};
///
/// let dict = dictionary! { "LW" => 10, "BM" => Operand::name("Multiply") };
/// assert_eq!(dict.get("LW"), Some(&Operand::Integer(10)));
/// ```
#[macro_export]
macro_rules! dictionary {
    () => {
        $crate::Dictionary::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut dict = $crate::Dictionary::new();
        $(
            dict.insert($crate::SmolStr::from($key), $crate::Operand::from($value));
        )+
        dict
    }};
}

/// A content stream operator with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOperation {
    /// Operator name (e.g., `"BT"`, `"Tf"`, `"Tj"`, `"m"`).
    pub name: SmolStr,
    pub operands: Vec<Operand>,
}

impl ContentOperation {
    pub fn new(name: impl Into<SmolStr>, operands: Vec<Operand>) -> Self {
        Self {
            name: name.into(),
            operands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_integer_has_no_fraction() {
        assert_eq!(Operand::Integer(5).to_string(), "5");
        assert_eq!(Operand::Integer(-12).to_string(), "-12");
    }

    #[test]
    fn display_real_keeps_fraction() {
        assert_eq!(Operand::Real(5.0).to_string(), "5.0");
        assert_eq!(Operand::Real(5.45).to_string(), "5.45");
        assert_eq!(Operand::Real(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn display_real_never_uses_exponent() {
        assert_eq!(Operand::Real(0.00001).to_string(), "0.00001");
        assert_eq!(Operand::Real(1e21).to_string(), "1000000000000000000000.0");
    }

    #[test]
    fn display_name_is_token() {
        assert_eq!(Operand::name("F1").to_string(), "/F1");
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(Operand::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Operand::Real(2.5).as_f64(), Some(2.5));
        assert_eq!(Operand::Real(2.0).as_i64(), Some(2));
        assert_eq!(Operand::Real(2.5).as_i64(), None);
        assert_eq!(Operand::name("X").as_f64(), None);
    }

    #[test]
    fn string_accessor_covers_both_forms() {
        assert_eq!(Operand::string("ab").as_bytes(), Some(&b"ab"[..]));
        assert_eq!(Operand::HexString(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn dictionary_macro_preserves_order() {
        let dict = dictionary! { "Z" => 1, "A" => 2.5, "M" => true };
        let keys: Vec<&str> = dict.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
        assert_eq!(dict["A"], Operand::Real(2.5));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Operand::Null.kind(), "null");
        assert_eq!(Operand::HexString(vec![]).kind(), "string");
        assert_eq!(Operand::Array(vec![]).kind(), "array");
    }
}
