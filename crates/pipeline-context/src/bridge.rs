//! Conversions between context values, template tokens, and generic JSON.
//!
//! - [`to_template_token`] / [`to_context_value`] are structural inverses for trees
//!   whose mappings have literal keys: Dictionary ↔ Mapping, Array ↔ Sequence,
//!   String ↔ Literal.
//! - [`to_json`] flattens a context tree into a plain `serde_json::Value` for
//!   external consumers. It is one-way; nothing here parses generic JSON back.

use serde_json::{Map, Value};

use crate::error::{ContextError, Result};
use crate::token::{LiteralToken, MappingToken, SequenceToken, TemplateToken};
use crate::types::{ArrayValue, ContextValue, DictionaryValue, StringValue};

/// Flatten a context tree into generic JSON.
///
/// Null text becomes `""`. Dictionary entries are written in insertion order and
/// a later duplicate key overwrites an earlier one.
pub fn to_json(value: &ContextValue) -> Value {
    match value {
        ContextValue::String(s) => Value::String(s.value().unwrap_or_default().to_string()),
        ContextValue::Array(array) => Value::Array(array.iter().map(to_json).collect()),
        ContextValue::Dictionary(dict) => {
            let mut object = Map::with_capacity(dict.len());
            for (key, value) in dict.iter() {
                object.insert(key.to_string(), to_json(value));
            }
            Value::Object(object)
        }
    }
}

/// Render a context tree as a template token tree.
pub fn to_template_token(value: &ContextValue) -> TemplateToken {
    match value {
        ContextValue::Dictionary(dict) => {
            let mut mapping = MappingToken::new();
            for (key, value) in dict.iter() {
                mapping.push(TemplateToken::literal(key), to_template_token(value));
            }
            TemplateToken::Mapping(mapping)
        }
        ContextValue::Array(array) => {
            let mut sequence = SequenceToken::new();
            for item in array {
                sequence.push(to_template_token(item));
            }
            TemplateToken::Sequence(sequence)
        }
        ContextValue::String(s) => {
            TemplateToken::Literal(LiteralToken::from(s.value().map(str::to_string)))
        }
    }
}

/// Convert a template token tree into a context tree.
///
/// Mapping keys must be literals; a literal key with null text becomes `""`.
/// Tokens other than Literal, Sequence and Mapping have no context form.
pub fn to_context_value(token: &TemplateToken) -> Result<ContextValue> {
    match token {
        TemplateToken::Mapping(mapping) => mapping_to_value(mapping),
        TemplateToken::Sequence(sequence) => sequence_to_value(sequence),
        TemplateToken::Literal(literal) => Ok(literal_to_value(literal)),
        other => Err(ContextError::UnsupportedToken(other.kind().name())),
    }
}

/// Convert a literal token, requiring the result to be a string.
pub fn literal_to_string(token: &LiteralToken) -> Result<StringValue> {
    literal_to_value(token).into_string("literal token")
}

/// Convert a sequence token, requiring the result to be an array.
pub fn sequence_to_array(token: &SequenceToken) -> Result<ArrayValue> {
    sequence_to_value(token)?.into_array("sequence token")
}

fn literal_to_value(literal: &LiteralToken) -> ContextValue {
    ContextValue::String(StringValue::from(literal.value().map(str::to_string)))
}

fn sequence_to_value(sequence: &SequenceToken) -> Result<ContextValue> {
    let array = sequence
        .iter()
        .map(to_context_value)
        .collect::<Result<ArrayValue>>()?;
    Ok(ContextValue::Array(array))
}

fn mapping_to_value(mapping: &MappingToken) -> Result<ContextValue> {
    let mut dict = DictionaryValue::new();
    for (key, value) in mapping.iter() {
        let key = match key {
            TemplateToken::Literal(literal) => literal.value().unwrap_or_default().to_string(),
            other => {
                return Err(ContextError::InvalidKey {
                    actual: other.kind().name(),
                })
            }
        };
        dict.insert(key, to_context_value(value)?);
    }
    Ok(ContextValue::Dictionary(dict))
}

impl From<&ContextValue> for TemplateToken {
    fn from(value: &ContextValue) -> Self {
        to_template_token(value)
    }
}

impl TryFrom<&TemplateToken> for ContextValue {
    type Error = ContextError;

    fn try_from(token: &TemplateToken) -> Result<Self> {
        to_context_value(token)
    }
}
