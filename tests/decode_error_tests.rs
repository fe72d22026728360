use toon_codec::{
    decode, decode_with_options, encode, encode_with_options, toon, DecodeOptions,
    DuplicateKeyPolicy, EncodeOptions, Error, ErrorKind, IndentMode, Location, Position, Value,
};

fn decode_err(text: &str) -> Error {
    match decode(text) {
        Ok(value) => panic!("expected an error for {text:?}, got {value:?}"),
        Err(err) => err,
    }
}

fn assert_error(text: &str, kind: ErrorKind, line: usize, column: usize) {
    let err = decode_err(text);
    assert_eq!(err.kind(), kind, "{text:?}: {err}");
    assert_eq!(err.position(), Some(Position::new(line, column)), "{text:?}: {err}");
}

#[test]
fn test_indentation_errors() {
    assert_error("a:1\n\tb:2", ErrorKind::IndentationError, 2, 1);
    assert_error("a:\n  \tb:2", ErrorKind::IndentationError, 2, 3);
    assert_error("a:\n  b:1\n c:2", ErrorKind::IndentationError, 3, 2);
    assert_error("a:\n  b:\n   c:1", ErrorKind::IndentationError, 3, 4);
    assert_error("  a:1", ErrorKind::IndentationError, 1, 3);
}

#[test]
fn test_over_indented_lines() {
    assert_error("a:1\n  b:2", ErrorKind::IndentationError, 2, 3);
    assert_error("a:\n  b:\n      c:1", ErrorKind::IndentationError, 3, 7);
    assert_error("@:[1]\n  - 2", ErrorKind::IndentationError, 2, 3);
}

#[test]
fn test_fixed_indent_mode() {
    let options = DecodeOptions::new().with_indent(IndentMode::Fixed(2));
    assert!(decode_with_options("a:\n  b:\n    c:1", &options).is_ok());

    let err = decode_with_options("a:\n    b:1\n  c:2", &DecodeOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndentationError);
    assert_eq!(err.position(), Some(Position::new(3, 3)));

    let options = DecodeOptions::new().with_indent(IndentMode::Fixed(4));
    let err = decode_with_options("a:\n  b:1", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndentationError);
    assert_eq!(err.position(), Some(Position::new(2, 3)));
}

#[test]
fn test_string_errors() {
    assert_error("a:\"abc", ErrorKind::UnterminatedString, 1, 3);
    assert_error("\"key:1", ErrorKind::UnterminatedString, 1, 1);
    assert_error("a:[\"x,y]", ErrorKind::UnterminatedString, 1, 4);
    assert_error("a:\"\\q\"", ErrorKind::InvalidEscape, 1, 4);

    for text in ["a:\"\\u12\"", "a:\"\\uzzzz\"", "a:\"\\ud800\"", "a:\"\\udc00x\""] {
        assert_eq!(decode_err(text).kind(), ErrorKind::InvalidEscape, "{text}");
    }
}

#[test]
fn test_number_errors() {
    assert_error("n:-1e400", ErrorKind::InvalidNumberLiteral, 1, 3);
    assert_error("a:[1,2e999]", ErrorKind::InvalidNumberLiteral, 1, 6);
    assert_error("@:\n  - 1e309", ErrorKind::InvalidNumberLiteral, 2, 5);

    match decode_err("n:1e999") {
        Error::InvalidNumberLiteral { literal, .. } => assert_eq!(literal, "1e999"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unclosed_inline_collections() {
    assert_error("a:[1,2", ErrorKind::UnclosedInlineCollection, 1, 3);
    assert_error("a:[", ErrorKind::UnclosedInlineCollection, 1, 3);
    assert_error("a:{", ErrorKind::UnclosedInlineCollection, 1, 3);
    assert_error("@:\n  - [1", ErrorKind::UnclosedInlineCollection, 2, 5);
}

#[test]
fn test_duplicate_keys() {
    assert_error("a:1\nb:2\na:3", ErrorKind::DuplicateKey, 3, 1);
    assert_error("x:\n  k:1\n  k:2", ErrorKind::DuplicateKey, 3, 3);
    assert_error("@:\n  - k:1\n    k:2", ErrorKind::DuplicateKey, 3, 5);
    assert_error("a:1\n\"a\":2", ErrorKind::DuplicateKey, 2, 1);

    match decode_err("id:1\nid:2") {
        Error::DuplicateKey { key, .. } => assert_eq!(key, "id"),
        other => panic!("unexpected {other:?}"),
    }

    // The same key in sibling objects is fine.
    assert!(decode("@:\n  - k:1\n  - k:2").is_ok());

    let options = DecodeOptions {
        duplicate_keys: DuplicateKeyPolicy::Reject,
        ..DecodeOptions::default()
    };
    let err = decode_with_options("x:\n  - k:1\n    j:2\n    k:3", &options).unwrap_err();
    assert_eq!(err, Error::duplicate_key(Position::new(4, 5), "k"));
}

#[test]
fn test_member_syntax_errors() {
    assert_error("abc", ErrorKind::ExpectedColon, 1, 4);
    assert_error("a:\n  just text", ErrorKind::ExpectedColon, 2, 12);
    assert_error("\"k\"=1", ErrorKind::ExpectedColon, 1, 4);
    assert_error(":1", ErrorKind::MissingKey, 1, 1);
    assert_error("a:\n  :x", ErrorKind::MissingKey, 2, 3);
}

#[test]
fn test_unexpected_characters() {
    assert_error("a:\"x\" y", ErrorKind::UnexpectedCharacter, 1, 7);
    assert_error("a:{x}", ErrorKind::UnexpectedCharacter, 1, 4);
    assert_error("a:[[1]]", ErrorKind::UnexpectedCharacter, 1, 4);
    assert_error("a:[1,,2]", ErrorKind::UnexpectedCharacter, 1, 6);
    assert_error("a:[1] x", ErrorKind::UnexpectedCharacter, 1, 7);

    match decode_err("a:{x}") {
        Error::UnexpectedCharacter { found, .. } => assert_eq!(found, 'x'),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unexpected_lines() {
    assert_error("- 1", ErrorKind::UnexpectedLine, 1, 1);
    assert_error("-", ErrorKind::UnexpectedLine, 1, 1);
    assert_error("a:1\n@:2", ErrorKind::UnexpectedLine, 2, 1);
    assert_error("@:1\nb:2", ErrorKind::UnexpectedLine, 2, 1);
    assert_error("a:\n  b:1\n  - 2", ErrorKind::UnexpectedLine, 3, 3);
    assert_error("a:\n  - 1\n  b:2", ErrorKind::UnexpectedLine, 3, 3);
}

#[test]
fn test_root_marker_is_only_valid_at_the_top() {
    assert_error("a:\n  @:1", ErrorKind::UnexpectedLine, 2, 3);
    assert_error("@:\n  - @:1", ErrorKind::UnexpectedLine, 2, 5);
    assert_error("@:\n  - k:\n      @:[]", ErrorKind::UnexpectedLine, 3, 7);

    let value = toon!({"a": {"@": 1}, "list": [{"@": 2}]});
    let text = encode(&value).unwrap();
    assert_eq!(text, "a:\n  \"@\":1\nlist:\n  - \"@\":2");
    assert_eq!(decode(&text).unwrap(), value);
}

#[test]
fn test_reports_a_single_error() {
    assert_error("a:\"x\nb:\"y", ErrorKind::UnterminatedString, 1, 3);
    assert_error("a:1\na:2\na:3", ErrorKind::DuplicateKey, 2, 1);
}

#[test]
fn test_decode_depth_limit() {
    let options = DecodeOptions::new().with_max_depth(2);
    assert!(decode_with_options("a:\n  b:1", &options).is_ok());

    let err = decode_with_options("a:\n  b:\n    c:1", &options).unwrap_err();
    assert_eq!(
        err,
        Error::DepthExceeded {
            location: Location::Source(Position::new(2, 3)),
            max_depth: 2
        }
    );

    let err = decode_with_options("a:\n  b:[]", &options).unwrap_err();
    assert_eq!(err.position(), Some(Position::new(2, 3)));

    let options = DecodeOptions::new().with_max_depth(1);
    assert!(decode_with_options("a:1\nb:x", &options).is_ok());
    assert!(decode_with_options("@:[1,2]", &options).is_ok());

    let err = decode_with_options("a:[1]", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(err.position(), Some(Position::new(1, 1)));

    let err = decode_with_options("@:\n  -\n    - 1", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(err.position(), Some(Position::new(2, 3)));
}

#[test]
fn test_deep_input_is_rejected_without_overflow() {
    let mut text = String::new();
    for depth in 0..1_000 {
        text.push_str(&" ".repeat(depth));
        text.push_str("k:\n");
    }

    let err = decode(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn test_encode_depth_limit() {
    let options = EncodeOptions::new().with_max_depth(2);
    assert!(encode_with_options(&toon!({"a": {"b": 1}}), &options).is_ok());

    let err = encode_with_options(&toon!({"a": {"b": {"c": 1}}}), &options).unwrap_err();
    assert_eq!(
        err,
        Error::DepthExceeded {
            location: Location::Path("$.a.b".to_string()),
            max_depth: 2
        }
    );

    let err = encode_with_options(&toon!([[[1]]]), &options).unwrap_err();
    assert_eq!(err.path(), Some("$[0][0]"));
}

#[test]
fn test_depth_limit_is_symmetric() {
    let values = [
        toon!({"a": {"b": {}}}),
        toon!([[[]]]),
        toon!([{"a": [1]}]),
        toon!({"a": [[1], {"b": {}}]}),
    ];

    for value in values {
        let text = encode(&value).unwrap();
        for max_depth in 1..=5 {
            let encoded = encode_with_options(&value, &EncodeOptions::new().with_max_depth(max_depth));
            let decoded =
                decode_with_options(&text, &DecodeOptions::new().with_max_depth(max_depth));
            assert_eq!(
                encoded.is_ok(),
                decoded.is_ok(),
                "max_depth {max_depth} disagrees for {text:?}"
            );
        }
    }
}

#[test]
fn test_input_size_limit() {
    let options = DecodeOptions::new().with_max_input_len(5);
    assert!(decode_with_options("a:1", &options).is_ok());

    let err = decode_with_options("a:1\nb:2", &options).unwrap_err();
    assert_eq!(err, Error::InputTooLarge { len: 7, max: 5 });
    assert_eq!(err.position(), None);
}

#[test]
fn test_unsupported_values() {
    for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let value = toon!({"scores": [1, (n)]});
        let err = encode(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
        assert_eq!(err.path(), Some("$.scores[1]"));
    }

    let err = encode(&Value::Number(f64::NAN)).unwrap_err();
    assert_eq!(err.path(), Some("$"));
}

#[test]
fn test_error_messages_name_the_location() {
    let err = decode_err("a:1\na:2");
    assert_eq!(err.to_string(), "Duplicate key `a` at line 2, column 1");

    let err = encode(&toon!({"x y": (f64::NAN)})).unwrap_err();
    assert!(err.to_string().contains("$[\"x y\"]"), "{err}");
}
