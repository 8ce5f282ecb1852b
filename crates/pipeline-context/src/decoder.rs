//! Wire decoder: reads context values from the compact tagged JSON form.
//!
//! Read rules, applied to each JSON token:
//!
//! 1. A bare string is a [`ContextValue::String`] (shorthand form).
//! 2. Any other non-object token yields no value. This is permissive, not an error.
//! 3. For an object, the `"t"` discriminator selects the variant. A missing `"t"`
//!    means String. A `"t"` that is not an integer leaves the caller's existing
//!    value untouched (see [`decode_value_into`]). Any integer outside the known
//!    set, including ones too large for `i64`, is an error.
//! 4. An empty instance of the variant is created, then populated from the
//!    remaining fields. Unknown tags fail with [`ContextError::UnsupportedTag`].
//!
//! Inside containers, a JSON `null` item reads back as a null-text string, which
//! is what the encoder writes for one. Items that yield no value are skipped.
//!
//! # Example
//! ```
//! use pipeline_context::{decode, ContextKind};
//!
//! let value = decode(r#"{"t":2,"d":[{"k":"os","v":"linux"}]}"#).unwrap().unwrap();
//! assert_eq!(value.kind(), ContextKind::Dictionary);
//! assert!(decode("42").unwrap().is_none());
//! ```

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::encoder::{
    ITEMS_FIELD, KEY_FIELD, MAX_NESTING_DEPTH, PAIRS_FIELD, TAG_FIELD, TEXT_FIELD, VALUE_FIELD,
};
use crate::error::{ContextError, Result};
use crate::types::{ArrayValue, ContextKind, ContextValue, DictionaryValue, StringValue};

/// JSON nesting that a payload within [`MAX_NESTING_DEPTH`] can need: three
/// levels per dictionary (`{"d":[{"v":..}]}`) plus an object-form leaf string.
const MAX_JSON_DEPTH: usize = MAX_NESTING_DEPTH * 3 + 1;

/// Decode wire JSON text. Returns `Ok(None)` when the payload holds no context value.
///
/// Payloads nested deeper than [`MAX_NESTING_DEPTH`] containers are rejected with
/// [`ContextError::DepthLimitExceeded`], matching what [`crate::encode`] accepts.
pub fn decode(json: &str) -> Result<Option<ContextValue>> {
    check_json_depth(json)?;
    // The scan above bounds nesting, so the parser's own recursion limit (which
    // sits below what the encoder may write) is lifted.
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    decode_value(&value)
}

/// Decode an already-parsed wire JSON tree.
pub fn decode_value(json: &Value) -> Result<Option<ContextValue>> {
    decode_value_into(json, None)
}

/// Decode a wire JSON tree, merging over an existing value.
///
/// `existing` is returned unchanged when the object's discriminator is present
/// but not an integer. In every other case it is discarded.
pub fn decode_value_into(
    json: &Value,
    existing: Option<ContextValue>,
) -> Result<Option<ContextValue>> {
    read_node(json, existing, 0)
}

/// Read one node. `depth` counts the containers enclosing it.
fn read_node(
    json: &Value,
    existing: Option<ContextValue>,
    depth: usize,
) -> Result<Option<ContextValue>> {
    let object = match json {
        Value::String(text) => return Ok(Some(ContextValue::string(text.as_str()))),
        Value::Object(object) => object,
        other => {
            debug!(json_type = json_type_name(other), "non-object context token yields no value");
            return Ok(None);
        }
    };

    let kind = match object.get(TAG_FIELD) {
        None => ContextKind::String,
        Some(Value::Number(tag)) if !tag.is_f64() => {
            match tag.as_i64().and_then(ContextKind::from_tag) {
                Some(kind) => kind,
                None => return Err(ContextError::UnsupportedTag(tag.to_string())),
            }
        }
        Some(tag) => {
            debug!(
                tag_type = json_type_name(tag),
                "non-integer discriminator, keeping existing value"
            );
            return Ok(existing);
        }
    };

    if kind != ContextKind::String && depth >= MAX_NESTING_DEPTH {
        return Err(ContextError::DepthLimitExceeded {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let value = match kind {
        ContextKind::String => ContextValue::String(read_string(object)),
        ContextKind::Array => ContextValue::Array(read_array(object, depth + 1)?),
        ContextKind::Dictionary => ContextValue::Dictionary(read_dictionary(object, depth + 1)?),
    };
    Ok(Some(value))
}

/// Reject text whose bracket nesting exceeds [`MAX_JSON_DEPTH`], before parsing.
fn check_json_depth(json: &str) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > MAX_JSON_DEPTH {
                    return Err(ContextError::DepthLimitExceeded {
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Populate a string from its object form. Without an `"s"` field the text is empty.
fn read_string(object: &Map<String, Value>) -> StringValue {
    match object.get(TEXT_FIELD) {
        Some(Value::String(text)) => StringValue::new(text.as_str()),
        Some(Value::Null) => StringValue::null(),
        _ => StringValue::new(""),
    }
}

fn read_array(object: &Map<String, Value>, depth: usize) -> Result<ArrayValue> {
    let mut array = ArrayValue::new();
    let items = match object.get(ITEMS_FIELD) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            trace!(json_type = json_type_name(other), "ignoring malformed array items field");
            return Ok(array);
        }
        None => return Ok(array),
    };
    for (index, item) in items.iter().enumerate() {
        match read_item(item, depth)? {
            Some(value) => array.push(value),
            None => trace!(index, "skipping array item with no context value"),
        }
    }
    Ok(array)
}

fn read_dictionary(object: &Map<String, Value>, depth: usize) -> Result<DictionaryValue> {
    let mut dict = DictionaryValue::new();
    let pairs = match object.get(PAIRS_FIELD) {
        Some(Value::Array(pairs)) => pairs,
        Some(other) => {
            trace!(json_type = json_type_name(other), "ignoring malformed dictionary pairs field");
            return Ok(dict);
        }
        None => return Ok(dict),
    };
    for (index, pair) in pairs.iter().enumerate() {
        let Value::Object(pair) = pair else {
            trace!(index, "skipping non-object dictionary pair");
            continue;
        };
        let key = match pair.get(KEY_FIELD) {
            Some(Value::String(key)) => key.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => {
                trace!(index, key_type = json_type_name(other), "skipping pair with non-string key");
                continue;
            }
        };
        let value = match pair.get(VALUE_FIELD) {
            Some(value) => read_item(value, depth)?,
            None => None,
        };
        match value {
            Some(value) => {
                dict.insert(key, value);
            }
            None => trace!(index, key = %key, "skipping pair with no context value"),
        }
    }
    Ok(dict)
}

/// Read a container child. `null` is a null-text string here.
fn read_item(json: &Value, depth: usize) -> Result<Option<ContextValue>> {
    match json {
        Value::Null => Ok(Some(ContextValue::null_string())),
        other => read_node(other, None, depth),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for ContextValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        decode_value(&json)
            .map_err(de::Error::custom)?
            .ok_or_else(|| de::Error::custom("payload did not contain a context value"))
    }
}
