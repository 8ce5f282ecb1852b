//! Error types for context value narrowing, wire decoding, and token conversion.

use thiserror::Error;

/// Errors that can occur while reading, decoding, or converting context values.
#[derive(Error, Debug)]
pub enum ContextError {
    /// A value was narrowed to a variant it is not. `actual` is `"none"` when
    /// no value was present at all.
    #[error("Unexpected type '{actual}' encountered while reading '{description}'. The type '{expected}' was expected.")]
    UnexpectedType {
        description: String,
        actual: &'static str,
        expected: &'static str,
    },

    /// A wire payload carried an integer discriminator outside the known set.
    /// Holds the tag as written, since it may not fit in an `i64`.
    #[error("Unexpected context value type tag '{0}'")]
    UnsupportedTag(String),

    /// A tree or payload nested deeper than the codec accepts.
    #[error("Context value nesting exceeds the maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// A template token kind that has no context value form.
    #[error("Unexpected template token type '{0}'")]
    UnsupportedToken(&'static str),

    /// A mapping token key that is not a literal.
    #[error("Mapping key must be a literal, found '{actual}'")]
    InvalidKey { actual: &'static str },

    /// The input text was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout pipeline-context.
pub type Result<T> = std::result::Result<T, ContextError>;
