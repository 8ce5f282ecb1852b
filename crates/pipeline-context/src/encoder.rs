//! Wire encoder: writes context values in the compact tagged JSON form.
//!
//! The wire shape is shared with peer services and is reproduced exactly:
//!
//! ```text
//! String      "some text"                         (shorthand, no tag)
//! Array       {"t":1}                             (empty: no "a" field)
//!             {"t":1,"a":[<node>, ...]}
//! Dictionary  {"t":2}                             (empty: no "d" field)
//!             {"t":2,"d":[{"k":"<key>","v":<node>}, ...]}
//! ```
//!
//! A string whose text is null is written as JSON `null`.
//!
//! Encoding goes through [`serde::Serialize`], so a [`ContextValue`] can also be
//! embedded directly in any larger serde message. Field order (`t` before `a`/`d`,
//! `k` before `v`) is fixed by the impls below and does not depend on map ordering.
//!
//! The `encode*` entry points refuse trees nested deeper than [`MAX_NESTING_DEPTH`]
//! containers, the same bound [`crate::decode`] applies, so anything they write
//! reads back. The `Serialize` impls do not check depth.
//!
//! # Example
//! ```
//! use pipeline_context::{encode, ArrayValue, ContextValue};
//!
//! let mut array = ArrayValue::new();
//! array.push("a");
//! assert_eq!(encode(&ContextValue::Array(array)).unwrap(), r#"{"t":1,"a":["a"]}"#);
//! assert_eq!(encode(&ContextValue::Array(ArrayValue::new())).unwrap(), r#"{"t":1}"#);
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ContextError, Result};
use crate::types::{ArrayValue, ContextKind, ContextValue, DictionaryValue, StringValue};

/// Discriminator field.
pub(crate) const TAG_FIELD: &str = "t";
/// Array items field.
pub(crate) const ITEMS_FIELD: &str = "a";
/// Dictionary pairs field.
pub(crate) const PAIRS_FIELD: &str = "d";
pub(crate) const KEY_FIELD: &str = "k";
pub(crate) const VALUE_FIELD: &str = "v";
/// Text field of the (rare) object form of a string.
pub(crate) const TEXT_FIELD: &str = "s";

/// Deepest container nesting the codec writes or reads. A lone string is 0, a
/// dictionary of strings is 1.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Encode a context value into its compact wire JSON text.
pub fn encode(value: &ContextValue) -> Result<String> {
    check_depth(value)?;
    Ok(serde_json::to_string(value)?)
}

/// Encode a context value into a wire JSON tree.
pub fn encode_value(value: &ContextValue) -> Result<Value> {
    check_depth(value)?;
    Ok(serde_json::to_value(value)?)
}

/// Encode a possibly-absent node. An absent node is written as JSON `null`.
pub fn encode_optional(value: Option<&ContextValue>) -> Result<Value> {
    match value {
        Some(value) => encode_value(value),
        None => Ok(Value::Null),
    }
}

fn check_depth(value: &ContextValue) -> Result<()> {
    if value.nesting_depth() > MAX_NESTING_DEPTH {
        return Err(ContextError::DepthLimitExceeded {
            limit: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}

impl Serialize for ContextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ContextValue::String(s) => s.serialize(serializer),
            ContextValue::Array(array) => array.serialize(serializer),
            ContextValue::Dictionary(dict) => dict.serialize(serializer),
        }
    }
}

impl Serialize for StringValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value() {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }
}

impl Serialize for ArrayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = if self.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(fields))?;
        map.serialize_entry(TAG_FIELD, &ContextKind::Array.tag())?;
        if !self.is_empty() {
            map.serialize_entry(ITEMS_FIELD, self.as_slice())?;
        }
        map.end()
    }
}

impl Serialize for DictionaryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = if self.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(fields))?;
        map.serialize_entry(TAG_FIELD, &ContextKind::Dictionary.tag())?;
        if !self.is_empty() {
            map.serialize_entry(PAIRS_FIELD, &WirePairs(self))?;
        }
        map.end()
    }
}

/// The `"d"` array: one `{"k","v"}` object per entry, in insertion order.
struct WirePairs<'a>(&'a DictionaryValue);

impl Serialize for WirePairs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|(key, value)| WirePair { key, value }))
    }
}

struct WirePair<'a> {
    key: &'a str,
    value: &'a ContextValue,
}

impl Serialize for WirePair<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(KEY_FIELD, self.key)?;
        map.serialize_entry(VALUE_FIELD, self.value)?;
        map.end()
    }
}
