//! Resources collaborator.
//!
//! Operators that refer to named resources (`gs`, `CS`/`cs`) go through the
//! [`Resources`] trait, keeping the processor independent of where resource
//! dictionaries come from.

use crate::color_space::ColorSpace;
use crate::error::{ContentError, Result};
use crate::operand::{Dictionary, Operand};

/// Named resources available to a content stream.
pub trait Resources {
    /// Resolve a color space by name.
    ///
    /// Device spaces resolve without a lookup; other names are read from the
    /// `/ColorSpace` category.
    fn color_space(&self, name: &str) -> Result<ColorSpace>;

    /// The external graphics state parameter dictionary named `name`.
    ///
    /// Fails with [`ContentError::ResourceNotFound`] when the `/ExtGState`
    /// category or the entry is missing and with
    /// [`ContentError::MalformedResource`] when the entry is not a dictionary.
    fn ext_gstate(&self, name: &str) -> Result<Dictionary>;
}

/// In-memory resources: a dictionary of categories (`ExtGState`,
/// `ColorSpace`, ...) each mapping names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDictionary {
    categories: Dictionary,
}

impl ResourceDictionary {
    pub fn new(categories: Dictionary) -> Self {
        Self { categories }
    }

    /// The raw category dictionary.
    pub fn categories(&self) -> &Dictionary {
        &self.categories
    }

    /// Look up `name` in `category`, distinguishing a missing category or
    /// entry (`ResourceNotFound`) from a category that is not a dictionary.
    pub fn lookup(&self, category: &str, name: &str) -> Result<&Operand> {
        let entries = match self.categories.get(category) {
            Some(Operand::Dictionary(entries)) => entries,
            Some(other) => {
                return Err(ContentError::MalformedResource {
                    category: category.to_string(),
                    name: name.to_string(),
                    reason: format!("category is a {}, expected a dictionary", other.kind()),
                });
            }
            None => return Err(ContentError::not_found(category, name)),
        };
        entries
            .get(name)
            .ok_or_else(|| ContentError::not_found(category, name))
    }
}

impl From<Dictionary> for ResourceDictionary {
    fn from(categories: Dictionary) -> Self {
        Self::new(categories)
    }
}

impl Resources for ResourceDictionary {
    fn color_space(&self, name: &str) -> Result<ColorSpace> {
        if let Some(space) = ColorSpace::device(name) {
            return Ok(space);
        }
        let value = self.lookup("ColorSpace", name)?;
        ColorSpace::from_operand(value).ok_or_else(|| ContentError::MalformedResource {
            category: "ColorSpace".to_string(),
            name: name.to_string(),
            reason: "unsupported color space".to_string(),
        })
    }

    fn ext_gstate(&self, name: &str) -> Result<Dictionary> {
        match self.lookup("ExtGState", name)? {
            Operand::Dictionary(params) => Ok(params.clone()),
            other => Err(ContentError::MalformedResource {
                category: "ExtGState".to_string(),
                name: name.to_string(),
                reason: format!("expected a dictionary, got {}", other.kind()),
            }),
        }
    }
}
