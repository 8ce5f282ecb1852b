use pipeline_context::{
    assert_array, assert_dictionary, assert_string, ArrayValue, ContextError, ContextKind,
    ContextValue, DictionaryValue,
};

#[test]
fn as_array_on_string_reports_both_types() {
    let err = ContextValue::string("x").as_array("job steps").unwrap_err();
    match &err {
        ContextError::UnexpectedType {
            description,
            actual,
            expected,
        } => {
            assert_eq!(description, "job steps");
            assert_eq!(*actual, "String");
            assert_eq!(*expected, "Array");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Unexpected type 'String' encountered while reading 'job steps'. The type 'Array' was expected."
    );
}

#[test]
fn absent_value_reports_none() {
    let err = assert_dictionary(None, "outputs").unwrap_err();
    assert!(matches!(
        err,
        ContextError::UnexpectedType { actual: "none", expected: "Dictionary", .. }
    ));
    assert!(assert_array(None, "x").is_err());
    assert!(assert_string(None, "x").is_err());
}

#[test]
fn matching_narrowings_succeed() {
    let array = ContextValue::Array(ArrayValue::new());
    let dict = ContextValue::Dictionary(DictionaryValue::new());
    let text = ContextValue::string("t");

    assert!(array.as_array("a").is_ok());
    assert!(dict.as_dictionary("d").is_ok());
    assert_eq!(text.as_string("s").unwrap().value(), Some("t"));
    assert!(dict.as_string("s").is_err());
    assert!(array.as_dictionary("d").is_err());
}

#[test]
fn owned_narrowings() {
    let array = ContextValue::Array(ArrayValue::new()).into_array("a").unwrap();
    assert!(array.is_empty());
    let err = ContextValue::string("x").into_dictionary("d").unwrap_err();
    assert!(matches!(err, ContextError::UnexpectedType { actual: "String", .. }));
}

#[test]
fn clone_is_deep_and_independent() {
    let mut inner = ArrayValue::new();
    inner.push("1");
    let mut dict = DictionaryValue::new();
    dict.insert("list", inner);
    let original = ContextValue::Dictionary(dict);

    let mut copy = original.clone();
    assert_eq!(copy, original);

    if let ContextValue::Dictionary(dict) = &mut copy {
        dict.insert("extra", "x");
        let mut replacement = ArrayValue::new();
        replacement.push("2");
        dict.insert("list", replacement);
    }
    assert_ne!(copy, original);

    let dict = original.as_dictionary("original").unwrap();
    assert_eq!(dict.len(), 1);
    let list = dict.get("list").unwrap().as_array("list").unwrap();
    assert_eq!(list.get(0), Some(&ContextValue::string("1")));
}

#[test]
fn null_and_empty_strings_differ() {
    assert_ne!(ContextValue::null_string(), ContextValue::string(""));
}

#[test]
fn kind_and_tag_agree() {
    let values = [
        ContextValue::string("x"),
        ContextValue::Array(ArrayValue::new()),
        ContextValue::Dictionary(DictionaryValue::new()),
    ];
    for value in &values {
        let kind = value.kind();
        assert_eq!(ContextKind::from_tag(kind.tag()), Some(kind));
    }
}

#[test]
fn case_insensitive_lookup_is_order_independent() {
    let forward: DictionaryValue = [("Alpha", "1"), ("Beta", "2")].into_iter().collect();
    let reverse: DictionaryValue = [("Beta", "2"), ("Alpha", "1")].into_iter().collect();
    for dict in [&forward, &reverse] {
        assert_eq!(dict.get_ignore_case("alpha"), Some(&ContextValue::string("1")));
        assert_eq!(dict.get_ignore_case("BETA"), Some(&ContextValue::string("2")));
        assert!(dict.contains_key_ignore_case("beta"));
        assert!(!dict.contains_key("beta"));
    }
}
