//! Error types for the content stream layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Every failure is scoped
//! to a single operator invocation (or a single tokenize/serialize call) and is
//! returned to the caller; nothing here is fatal to the process.

use thiserror::Error;

/// Error type for content stream processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// A resource category or a named entry in it is absent.
    #[error("resource not found: /{category} /{name}")]
    ResourceNotFound { category: String, name: String },

    /// A resource entry exists but does not have the expected shape.
    #[error("malformed resource /{category} /{name}: {reason}")]
    MalformedResource {
        category: String,
        name: String,
        reason: String,
    },

    /// An operator received missing or mistyped operands.
    #[error("invalid operand for '{operator}': {reason}")]
    InvalidOperand { operator: String, reason: String },

    /// Malformed content stream syntax.
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// An operand cannot be written as a content stream token.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// Error reading the surrounding PDF document.
    #[error("document error: {0}")]
    Document(String),
}

impl ContentError {
    pub(crate) fn not_found(category: &str, name: &str) -> Self {
        ContentError::ResourceNotFound {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_operand(operator: &str, reason: impl Into<String>) -> Self {
        ContentError::InvalidOperand {
            operator: operator.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        ContentError::Syntax {
            offset,
            message: message.into(),
        }
    }
}

impl From<lopdf::Error> for ContentError {
    fn from(err: lopdf::Error) -> Self {
        ContentError::Document(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContentError>;
