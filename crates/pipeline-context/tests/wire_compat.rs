//! Wire compatibility vectors.
//!
//! Each vector is a payload as produced by peer services, paired with the tree it
//! must decode to and, where the encoding is canonical, the exact text we emit.

use pipeline_context::{
    decode, encode, to_json, traverse, ArrayValue, ContextKind, ContextValue, DictionaryValue,
};
use serde_json::json;

fn decode_some(wire: &str) -> ContextValue {
    decode(wire).unwrap().unwrap()
}

/// Decode, then check that re-encoding reproduces the payload byte for byte.
fn assert_canonical(wire: &str) -> ContextValue {
    let value = decode_some(wire);
    assert_eq!(encode(&value).unwrap(), wire);
    value
}

// ─────────────────────────────────────────────────────────────────────────────
// Discriminator values
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn discriminators_are_fixed_integers() {
    assert_eq!(decode_some(r#"{"t":0}"#).kind(), ContextKind::String);
    assert_eq!(decode_some(r#"{"t":1}"#).kind(), ContextKind::Array);
    assert_eq!(decode_some(r#"{"t":2}"#).kind(), ContextKind::Dictionary);
}

#[test]
fn string_object_form_normalizes_to_shorthand() {
    let value = decode_some(r#"{"t":0,"s":"abc"}"#);
    assert_eq!(encode(&value).unwrap(), r#""abc""#);
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical payloads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn canonical_empty_containers() {
    assert_canonical(r#"{"t":1}"#);
    assert_canonical(r#"{"t":2}"#);
}

#[test]
fn canonical_shorthand_string() {
    assert_canonical(r#""hello""#);
}

#[test]
fn canonical_job_payload() {
    let wire = concat!(
        r#"{"t":2,"d":["#,
        r#"{"k":"github","v":{"t":2,"d":[{"k":"ref","v":"refs/heads/main"},{"k":"event","v":{"t":2}}]}},"#,
        r#"{"k":"matrix","v":{"t":2,"d":[{"k":"os","v":"linux"},{"k":"versions","v":{"t":1,"a":["1","2"]}}]}},"#,
        r#"{"k":"inputs","v":{"t":1}}"#,
        r#"]}"#
    );
    let value = assert_canonical(wire);

    let root = value.as_dictionary("root").unwrap();
    assert_eq!(root.keys().collect::<Vec<_>>(), vec!["github", "matrix", "inputs"]);
    let matrix = root.get("matrix").unwrap().as_dictionary("matrix").unwrap();
    assert_eq!(
        matrix.get("versions").unwrap().as_array("versions").unwrap().len(),
        2
    );
}

#[test]
fn non_canonical_field_order_still_decodes() {
    let value = decode_some(r#"{"a":["x"],"t":1}"#);
    assert_eq!(encode(&value).unwrap(), r#"{"t":1,"a":["x"]}"#);

    let value = decode_some(r#"{"d":[{"v":"1","k":"a"}],"t":2}"#);
    assert_eq!(encode(&value).unwrap(), r#"{"t":2,"d":[{"k":"a","v":"1"}]}"#);
}

// ─────────────────────────────────────────────────────────────────────────────
// Downstream views of a decoded payload
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flattened_view_of_payload() {
    let value = decode_some(r#"{"t":2,"d":[{"k":"a","v":{"t":1,"a":["1","2"]}},{"k":"b","v":"x"}]}"#);
    assert_eq!(to_json(&value), json!({"a": ["1", "2"], "b": "x"}));
}

#[test]
fn traversal_view_of_payload() {
    let value = decode_some(r#"{"t":2,"d":[{"k":"a","v":{"t":1,"a":["1","2"]}},{"k":"b","v":"x"}]}"#);
    let strings: Vec<String> = traverse(&value, false)
        .filter_map(|item| item.as_string("item").ok().and_then(|s| s.value().map(str::to_string)))
        .collect();
    assert_eq!(strings, vec!["a", "1", "2", "b", "x"]);
}

#[test]
fn programmatic_tree_matches_payload() {
    let mut list = ArrayValue::new();
    list.push("1");
    list.push("2");
    let mut dict = DictionaryValue::new();
    dict.insert("a", list);
    dict.insert("b", "x");

    assert_eq!(
        encode(&ContextValue::Dictionary(dict)).unwrap(),
        r#"{"t":2,"d":[{"k":"a","v":{"t":1,"a":["1","2"]}},{"k":"b","v":"x"}]}"#
    );
}
