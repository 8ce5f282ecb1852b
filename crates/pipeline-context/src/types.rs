//! Context value types: the dynamically-typed tree that holds evaluated pipeline data.
//!
//! A [`ContextValue`] is exactly one of three shapes. The discriminator of each
//! shape is also its wire tag (see [`ContextKind::tag`]), so the numbering here is
//! part of the wire contract and must not change.
//!
//! Containers exclusively own their children; `Clone` is a deep copy.
//!
//! Dropping a tree is iterative, so arbitrarily deep trees built in code can be
//! released on any stack. `Clone`, `PartialEq` and `Debug` recurse; trees that go
//! through the codec are bounded by [`crate::MAX_NESTING_DEPTH`].

use std::collections::HashMap;
use std::fmt;

use crate::error::{ContextError, Result};

/// Variant discriminator of a [`ContextValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    String,
    Array,
    Dictionary,
}

impl ContextKind {
    /// The integer written into the `"t"` field of the wire format.
    pub const fn tag(self) -> i64 {
        match self {
            ContextKind::String => 0,
            ContextKind::Array => 1,
            ContextKind::Dictionary => 2,
        }
    }

    /// Resolve a wire tag. Returns `None` for tags outside the known set.
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(ContextKind::String),
            1 => Some(ContextKind::Array),
            2 => Some(ContextKind::Dictionary),
            _ => None,
        }
    }

    /// Human-readable type name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ContextKind::String => "String",
            ContextKind::Array => "Array",
            ContextKind::Dictionary => "Dictionary",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable, possibly-null text payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringValue(Option<String>);

impl StringValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    /// A string whose text is null (distinct from the empty string).
    pub fn null() -> Self {
        Self(None)
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<&str> for StringValue {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StringValue {
    fn from(text: String) -> Self {
        Self(Some(text))
    }
}

impl From<Option<String>> for StringValue {
    fn from(text: Option<String>) -> Self {
        Self(text)
    }
}

/// Ordered sequence of context values. Insertion order is significant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayValue {
    items: Vec<ContextValue>,
}

impl ArrayValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<ContextValue>) {
        self.items.push(item.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContextValue> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContextValue> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ContextValue] {
        &self.items
    }
}

impl FromIterator<ContextValue> for ArrayValue {
    fn from_iter<I: IntoIterator<Item = ContextValue>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ArrayValue {
    type Item = ContextValue;
    type IntoIter = std::vec::IntoIter<ContextValue>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.items).into_iter()
    }
}

impl<'a> IntoIterator for &'a ArrayValue {
    type Item = &'a ContextValue;
    type IntoIter = std::slice::Iter<'a, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Ordered mapping from unique string keys to context values.
///
/// `entries` is authoritative for iteration and serialization order. Two
/// position indexes sit beside it: `index` for exact (case-sensitive) key
/// identity and `folded` for case-insensitive lookup, where the first key
/// inserted under a given folding wins. Entries are never removed, so stored
/// positions stay valid.
#[derive(Clone, Default)]
pub struct DictionaryValue {
    entries: Vec<(String, ContextValue)>,
    index: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl DictionaryValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair.
    ///
    /// A new key is appended. An existing key (exact match) keeps its position
    /// and has its value replaced; the previous value is returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        let key = key.into();
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        let pos = self.entries.len();
        self.folded.entry(fold_key(&key)).or_insert(pos);
        self.index.insert(key.clone(), pos);
        self.entries.push((key, value));
        None
    }

    /// Case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Case-insensitive lookup. Independent of declaration order except when two
    /// keys differ only by case, in which case the earlier one is returned.
    pub fn get_ignore_case(&self, key: &str) -> Option<&ContextValue> {
        self.folded
            .get(&fold_key(key))
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.folded.contains_key(&fold_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` in insertion order.
    pub fn entry_at(&self, index: usize) -> Option<(&str, &ContextValue)> {
        self.entries.get(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &ContextValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

impl PartialEq for DictionaryValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for DictionaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for DictionaryValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl IntoIterator for DictionaryValue {
    type Item = (String, ContextValue);
    type IntoIter = std::vec::IntoIter<(String, ContextValue)>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.entries).into_iter()
    }
}

impl Drop for ArrayValue {
    fn drop(&mut self) {
        drop_nested(std::mem::take(&mut self.items));
    }
}

impl Drop for DictionaryValue {
    fn drop(&mut self) {
        drop_nested(
            std::mem::take(&mut self.entries)
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
        );
    }
}

/// Release a forest of values without recursing: each container is emptied onto
/// `pending` before it is dropped, so its own `Drop` finds nothing to descend into.
fn drop_nested(mut pending: Vec<ContextValue>) {
    while let Some(value) = pending.pop() {
        match value {
            ContextValue::Array(mut array) => pending.append(&mut array.items),
            ContextValue::Dictionary(mut dict) => {
                pending.extend(dict.entries.drain(..).map(|(_, value)| value));
            }
            ContextValue::String(_) => {}
        }
    }
}

/// A node of the context tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    String(StringValue),
    Array(ArrayValue),
    Dictionary(DictionaryValue),
}

impl ContextValue {
    pub fn string(text: impl Into<String>) -> Self {
        ContextValue::String(StringValue::new(text))
    }

    pub fn null_string() -> Self {
        ContextValue::String(StringValue::null())
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            ContextValue::String(_) => ContextKind::String,
            ContextValue::Array(_) => ContextKind::Array,
            ContextValue::Dictionary(_) => ContextKind::Dictionary,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, ContextValue::String(_))
    }

    /// Narrow to an array. `description` names what is being read, for diagnostics.
    pub fn as_array(&self, description: &str) -> Result<&ArrayValue> {
        assert_array(Some(self), description)
    }

    pub fn as_dictionary(&self, description: &str) -> Result<&DictionaryValue> {
        assert_dictionary(Some(self), description)
    }

    pub fn as_string(&self, description: &str) -> Result<&StringValue> {
        assert_string(Some(self), description)
    }

    pub fn into_array(self, description: &str) -> Result<ArrayValue> {
        match self {
            ContextValue::Array(array) => Ok(array),
            other => Err(unexpected(description, Some(&other), ContextKind::Array)),
        }
    }

    pub fn into_dictionary(self, description: &str) -> Result<DictionaryValue> {
        match self {
            ContextValue::Dictionary(dict) => Ok(dict),
            other => Err(unexpected(description, Some(&other), ContextKind::Dictionary)),
        }
    }

    pub fn into_string(self, description: &str) -> Result<StringValue> {
        match self {
            ContextValue::String(s) => Ok(s),
            other => Err(unexpected(description, Some(&other), ContextKind::String)),
        }
    }
}

/// Narrow a possibly-absent value to an array.
pub fn assert_array<'a>(
    value: Option<&'a ContextValue>,
    description: &str,
) -> Result<&'a ArrayValue> {
    match value {
        Some(ContextValue::Array(array)) => Ok(array),
        other => Err(unexpected(description, other, ContextKind::Array)),
    }
}

/// Narrow a possibly-absent value to a dictionary.
pub fn assert_dictionary<'a>(
    value: Option<&'a ContextValue>,
    description: &str,
) -> Result<&'a DictionaryValue> {
    match value {
        Some(ContextValue::Dictionary(dict)) => Ok(dict),
        other => Err(unexpected(description, other, ContextKind::Dictionary)),
    }
}

/// Narrow a possibly-absent value to a string.
pub fn assert_string<'a>(
    value: Option<&'a ContextValue>,
    description: &str,
) -> Result<&'a StringValue> {
    match value {
        Some(ContextValue::String(s)) => Ok(s),
        other => Err(unexpected(description, other, ContextKind::String)),
    }
}

fn unexpected(
    description: &str,
    actual: Option<&ContextValue>,
    expected: ContextKind,
) -> ContextError {
    ContextError::UnexpectedType {
        description: description.to_string(),
        actual: actual.map_or("none", |v| v.kind().name()),
        expected: expected.name(),
    }
}

impl From<StringValue> for ContextValue {
    fn from(value: StringValue) -> Self {
        ContextValue::String(value)
    }
}

impl From<ArrayValue> for ContextValue {
    fn from(value: ArrayValue) -> Self {
        ContextValue::Array(value)
    }
}

impl From<DictionaryValue> for ContextValue {
    fn from(value: DictionaryValue) -> Self {
        ContextValue::Dictionary(value)
    }
}

impl From<&str> for ContextValue {
    fn from(text: &str) -> Self {
        ContextValue::string(text)
    }
}

impl From<String> for ContextValue {
    fn from(text: String) -> Self {
        ContextValue::string(text)
    }
}
