//! # pipeline-context
//!
//! The pipeline **context data** model: a small, dynamically-typed tree value used
//! to hold evaluated template and expression results.
//!
//! A [`ContextValue`] is a String, an Array, or a Dictionary. Around it sit a
//! compact tag-discriminated JSON wire format shared with peer services, a
//! non-recursive depth-first walker, and conversions to and from the template
//! token tree and generic JSON.
//!
//! ## Quick start
//!
//! ```rust
//! use pipeline_context::{decode, encode, ContextValue, DictionaryValue};
//!
//! let mut matrix = DictionaryValue::new();
//! matrix.insert("os", "linux");
//! let value = ContextValue::Dictionary(matrix);
//!
//! let wire = encode(&value).unwrap();
//! assert_eq!(wire, r#"{"t":2,"d":[{"k":"os","v":"linux"}]}"#);
//!
//! let back = decode(&wire).unwrap();
//! assert_eq!(back, Some(value));
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `ContextValue` and its String/Array/Dictionary payloads
//! - [`encoder`] - context value → wire JSON
//! - [`decoder`] - wire JSON → context value
//! - [`walker`] - stack-based depth-first traversal
//! - [`bridge`] - template token and generic JSON conversions
//! - [`token`] - template token tree shapes
//! - [`error`] - Error types

pub mod bridge;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod token;
pub mod types;
pub mod walker;

pub use bridge::{
    literal_to_string, sequence_to_array, to_context_value, to_json, to_template_token,
};
pub use decoder::{decode, decode_value, decode_value_into};
pub use encoder::{encode, encode_optional, encode_value, MAX_NESTING_DEPTH};
pub use error::ContextError;
pub use token::{LiteralToken, MappingToken, SequenceToken, TemplateToken, TokenKind};
pub use types::{
    assert_array, assert_dictionary, assert_string, ArrayValue, ContextKind, ContextValue,
    DictionaryValue, StringValue,
};
pub use walker::{traverse, Traverse, TreeStats};
