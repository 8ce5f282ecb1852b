use pipeline_context::{
    literal_to_string, sequence_to_array, to_context_value, to_json, to_template_token,
    ArrayValue, ContextError, ContextValue, DictionaryValue, LiteralToken, MappingToken,
    SequenceToken, TemplateToken,
};
use serde_json::json;

fn sample() -> ContextValue {
    let mut steps = ArrayValue::new();
    steps.push("checkout");
    steps.push(ContextValue::null_string());
    let mut env = DictionaryValue::new();
    env.insert("CI", "true");
    let mut dict = DictionaryValue::new();
    dict.insert("steps", steps);
    dict.insert("env", env);
    dict.insert("empty", ArrayValue::new());
    ContextValue::Dictionary(dict)
}

// ============================================================================
// Generic JSON flattening
// ============================================================================

#[test]
fn to_json_flattens_all_shapes() {
    assert_eq!(
        to_json(&sample()),
        json!({
            "steps": ["checkout", ""],
            "env": {"CI": "true"},
            "empty": []
        })
    );
}

#[test]
fn to_json_keeps_insertion_order() {
    let mut dict = DictionaryValue::new();
    dict.insert("z", "1");
    dict.insert("a", "2");
    let text = serde_json::to_string(&to_json(&ContextValue::Dictionary(dict))).unwrap();
    assert_eq!(text, r#"{"z":"1","a":"2"}"#);
}

#[test]
fn to_json_null_text_becomes_empty_string() {
    assert_eq!(to_json(&ContextValue::null_string()), json!(""));
}

// ============================================================================
// Context value -> template token
// ============================================================================

#[test]
fn dictionary_becomes_literal_keyed_mapping() {
    let token = to_template_token(&sample());
    let TemplateToken::Mapping(mapping) = &token else {
        panic!("expected mapping, got {token:?}");
    };
    assert_eq!(mapping.len(), 3);
    let (key, value) = mapping.iter().next().unwrap();
    assert_eq!(key, &TemplateToken::literal("steps"));
    let TemplateToken::Sequence(sequence) = value else {
        panic!("expected sequence, got {value:?}");
    };
    let items: Vec<_> = sequence.iter().cloned().collect();
    assert_eq!(
        items,
        vec![
            TemplateToken::literal("checkout"),
            TemplateToken::Literal(LiteralToken::null())
        ]
    );
}

#[test]
fn string_becomes_literal() {
    assert_eq!(
        to_template_token(&ContextValue::string("x")),
        TemplateToken::literal("x")
    );
}

// ============================================================================
// Template token -> context value
// ============================================================================

#[test]
fn round_trips_through_tokens() {
    let value = sample();
    assert_eq!(to_context_value(&to_template_token(&value)).unwrap(), value);
}

#[test]
fn mapping_with_non_literal_key_is_rejected() {
    let mut mapping = MappingToken::new();
    mapping.push(TemplateToken::Sequence(SequenceToken::new()), TemplateToken::literal("v"));
    let err = to_context_value(&TemplateToken::Mapping(mapping)).unwrap_err();
    assert!(
        matches!(err, ContextError::InvalidKey { actual: "Sequence" }),
        "got {err:?}"
    );
}

#[test]
fn null_literal_key_becomes_empty_key() {
    let mut mapping = MappingToken::new();
    mapping.push(TemplateToken::Literal(LiteralToken::null()), TemplateToken::literal("v"));
    let value = to_context_value(&TemplateToken::Mapping(mapping)).unwrap();
    let dict = value.as_dictionary("mapping").unwrap();
    assert_eq!(dict.get(""), Some(&ContextValue::string("v")));
}

#[test]
fn unsupported_tokens_are_rejected() {
    for token in [
        TemplateToken::Null,
        TemplateToken::Boolean(true),
        TemplateToken::Number(1.0),
        TemplateToken::Expression("github.sha".to_string()),
    ] {
        let err = to_context_value(&token).unwrap_err();
        assert!(matches!(err, ContextError::UnsupportedToken(_)), "got {err:?}");
    }
}

#[test]
fn unsupported_token_nested_in_sequence_is_rejected() {
    let mut sequence = SequenceToken::new();
    sequence.push(TemplateToken::literal("ok"));
    sequence.push(TemplateToken::Expression("matrix.os".to_string()));
    let err = to_context_value(&TemplateToken::Sequence(sequence)).unwrap_err();
    assert!(matches!(err, ContextError::UnsupportedToken("Expression")));
}

#[test]
fn duplicate_mapping_keys_last_write_wins() {
    let mut mapping = MappingToken::new();
    mapping.push(TemplateToken::literal("a"), TemplateToken::literal("1"));
    mapping.push(TemplateToken::literal("a"), TemplateToken::literal("2"));
    let value = to_context_value(&TemplateToken::Mapping(mapping)).unwrap();
    let dict = value.as_dictionary("mapping").unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.get("a"), Some(&ContextValue::string("2")));
}

// ============================================================================
// Narrowing conversions
// ============================================================================

#[test]
fn literal_narrows_to_string() {
    let s = literal_to_string(&LiteralToken::new("hello")).unwrap();
    assert_eq!(s.value(), Some("hello"));
    assert!(literal_to_string(&LiteralToken::null()).unwrap().is_null());
}

#[test]
fn sequence_narrows_to_array() {
    let mut sequence = SequenceToken::new();
    sequence.push(TemplateToken::literal("a"));
    sequence.push(TemplateToken::Mapping(MappingToken::new()));
    let array = sequence_to_array(&sequence).unwrap();
    assert_eq!(array.len(), 2);
}

#[test]
fn conversion_traits_delegate() {
    let value = sample();
    let token = TemplateToken::from(&value);
    assert_eq!(ContextValue::try_from(&token).unwrap(), value);
}
