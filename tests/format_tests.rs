use toon_codec::{decode, encode, encode_with_options, toon, EncodeOptions, Value};

fn assert_canonical(value: &Value, expected: &str) {
    let text = encode(value).unwrap();
    assert_eq!(text, expected);
    assert_eq!(&decode(&text).unwrap(), value, "{text}");
}

#[test]
fn test_flat_object() {
    assert_canonical(
        &toon!({"name": "Alice", "age": 30, "admin": false, "manager": null}),
        "name:Alice\nage:30\nadmin:false\nmanager:null",
    );
}

#[test]
fn test_inline_primitive_array() {
    assert_canonical(
        &toon!({"tags": ["admin", "developer", "ops"], "ids": [1, 2.5, (-3)], "flags": [true, null]}),
        "tags:[admin,developer,ops]\nids:[1,2.5,-3]\nflags:[true,null]",
    );
}

#[test]
fn test_nested_objects() {
    assert_canonical(
        &toon!({"user": {"profile": {"city": "New York"}, "id": 7}}),
        "user:\n  profile:\n    city:New York\n  id:7",
    );
}

#[test]
fn test_list_of_objects() {
    assert_canonical(
        &toon!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob", "tags": ["x"]}]}),
        "users:\n  - id:1\n    name:Alice\n  - id:2\n    name:Bob\n    tags:[x]",
    );
}

#[test]
fn test_mixed_list() {
    assert_canonical(
        &toon!({"mixed": [1, "two", [3, 4], {"five": 5}, [], {}]}),
        "mixed:\n  - 1\n  - two\n  - [3,4]\n  - five:5\n  - []\n  - {}",
    );
}

#[test]
fn test_nested_block_lists() {
    assert_canonical(
        &toon!({"grid": [[[1, 2], [3]], [{"a": 1}]]}),
        "grid:\n  -\n    - [1,2]\n    - [3]\n  -\n    - a:1",
    );
}

#[test]
fn test_object_item_with_nested_first_member() {
    assert_canonical(
        &toon!([{"pos": {"x": 1, "y": 2}, "label": "origin"}, {"list": [[1]], "n": 0}]),
        "@:\n  - pos:\n      x:1\n      y:2\n    label:origin\n  - list:\n      - [1]\n    n:0",
    );
}

#[test]
fn test_empty_containers() {
    assert_canonical(&toon!({}), "");
    assert_canonical(&toon!([]), "@:[]");
    assert_canonical(&toon!({"a": {}, "b": []}), "a:{}\nb:[]");
    assert_canonical(&toon!([[]]), "@:\n  - []");
}

#[test]
fn test_root_scalars() {
    assert_canonical(&toon!(null), "@:null");
    assert_canonical(&toon!(true), "@:true");
    assert_canonical(&toon!(3.25), "@:3.25");
    assert_canonical(&toon!("hi there"), "@:hi there");
    assert_canonical(&toon!("42"), "@:\"42\"");
}

#[test]
fn test_number_formatting() {
    assert_canonical(
        &toon!([30, 100, 1000000, 0.5, 0.000001, 123.456, 1e21, (-0.0), 1.5e-7]),
        "@:[30,100,1e6,0.5,1e-6,123.456,1e21,-0,1.5e-7]",
    );
    assert_canonical(&Value::Number(0.1 + 0.2), "@:0.30000000000000004");
    assert_canonical(&Value::Number(9007199254740993.0), "@:9007199254740992");
}

#[test]
fn test_string_quoting() {
    assert_canonical(
        &toon!({
            "empty": "",
            "space": " x",
            "number": "3.14",
            "zero_padded": "05",
            "literal": "false",
            "bracket": "[x]",
            "brace": "{x}",
            "quote": "\"x",
            "colon_space": "a: b",
            "colon": "a:b",
            "comma": "a,b",
            "url": "http://example.com/a?b=c,d",
            "newline": "a\nb",
            "unicode": "café ☕"
        }),
        "empty:\"\"\n\
         space:\" x\"\n\
         number:\"3.14\"\n\
         zero_padded:\"05\"\n\
         literal:\"false\"\n\
         bracket:\"[x]\"\n\
         brace:\"{x}\"\n\
         quote:\"\\\"x\"\n\
         colon_space:\"a: b\"\n\
         colon:a:b\n\
         comma:a,b\n\
         url:http://example.com/a?b=c,d\n\
         newline:\"a\\nb\"\n\
         unicode:café ☕",
    );
}

#[test]
fn test_context_quoting() {
    assert_canonical(
        &toon!({
            "inline": ["a,b", "c]", "d:e", "f g"],
            "items": ["k:v", "plain", ["x"]]
        }),
        "inline:[\"a,b\",\"c]\",d:e,f g]\nitems:\n  - \"k:v\"\n  - plain\n  - [x]",
    );
}

#[test]
fn test_key_quoting() {
    assert_canonical(
        &toon!({
            "": 1,
            "@": 2,
            "a:b": 3,
            " pad": 4,
            "- dash": 5,
            "[k]": 6,
            "plain key": 7,
            "true": 8,
            "-": 9
        }),
        "\"\":1\n\"@\":2\n\"a:b\":3\n\" pad\":4\n\"- dash\":5\n\"[k]\":6\nplain key:7\ntrue:8\n-:9",
    );
}

#[test]
fn test_control_characters_are_escaped() {
    assert_canonical(
        &toon!({"s": "\u{0}\u{8}\u{c}\r\t\u{1b}"}),
        "s:\"\\u0000\\b\\f\\r\\t\\u001b\"",
    );
}

#[test]
fn test_custom_indent() {
    let value = toon!({"a": {"b": [{"c": 1, "d": 2}]}});
    let text = encode_with_options(&value, &EncodeOptions::new().with_indent(4)).unwrap();
    assert_eq!(text, "a:\n    b:\n        - c:1\n            d:2");
    assert_eq!(decode(&text).unwrap(), value);
}

#[test]
fn test_zero_indent_in_struct_literal_still_nests() {
    let value = toon!({"a": {"b": 1}, "c": [[1], {"d": 2}]});
    let options = EncodeOptions {
        indent: 0,
        max_depth: 128,
    };
    let text = encode_with_options(&value, &options).unwrap();
    assert_eq!(text, "a:\n b:1\nc:\n - [1]\n - d:2");
    assert_eq!(decode(&text).unwrap(), value);
}

#[test]
fn test_decoder_accepts_non_canonical_spacing() {
    let text = "name: Alice\r\n\r\ntags: [ a , \"b\" ]\n  \nmeta:   { }\nlist:\n  -   1\n  - \"x\"  \n";
    assert_eq!(
        decode(text).unwrap(),
        toon!({"name": "Alice", "tags": ["a", "b"], "meta": {}, "list": [1, "x"]})
    );
}

#[test]
fn test_decoder_escapes() {
    assert_eq!(
        decode(r#"s:"\/\u00e9\ud83d\ude00\"""#).unwrap(),
        toon!({"s": "/é😀\""})
    );
}
