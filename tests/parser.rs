//! End-to-end parser behaviour over whole documents.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use json_parser::{
    parse, parse_with_options, tokenize, EscapePolicy, Lexer, ParseError, ParseOptions,
    TokenKind, Value,
};
use rstest::rstest;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("Failed to read fixture")
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn object(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    )
}

#[rstest]
#[case("true", Value::Bool(true))]
#[case("false", Value::Bool(false))]
#[case("null", Value::Null)]
#[case("-3.e-2", Value::Number(-0.03))]
#[case("[]", Value::Array(vec![]))]
#[case("[true]", Value::Array(vec![Value::Bool(true)]))]
#[case(r#"["hello", "world"]"#, Value::Array(vec![string("hello"), string("world")]))]
#[case("{}", object(vec![]))]
#[case(r#"{"a":"b"}"#, object(vec![("a", string("b"))]))]
#[case(r#"[{"hello":"world"}]"#, Value::Array(vec![object(vec![("hello", string("world"))])]))]
#[case(r#""hello\r\n world""#, string("hello\r\n world"))]
#[case("[nil, nope]", Value::Array(vec![Value::Null, Value::Null]))]
#[case("[1,2,]", Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]))]
#[case("\u{A0}\u{2003} 7 \u{3000}", Value::Number(7.0))]
fn parses_documents(#[case] input: &str, #[case] expected: Value) {
    assert_eq!(parse(input).unwrap(), expected);
}

#[rstest]
#[case("", "unexpected end of input")]
#[case("{key: 1}", "unexpected invalid token `k` at position 1")]
#[case("123 abc", "trailing invalid token `a` at position 4 after a complete value")]
#[case("[1 2]", "unexpected number token `2` at position 3")]
#[case(r#"{"a":1 "b":2}"#, "unexpected string token `\"b\"` at position 7")]
#[case("[1,", "unexpected end of input")]
#[case("[1", "unexpected EOF token `` at position 2")]
#[case("}", "unexpected `}` token `}` at position 0")]
#[case("tru", "malformed boolean literal `tru` at position 0")]
#[case("1e+5", "malformed number literal `1e` at position 0")]
#[case("--1", "malformed number literal `--1` at position 0")]
#[case("#", "invalid token `#` at position 0")]
fn reports_errors(#[case] input: &str, #[case] message: &str) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn plus_signed_exponents_are_rejected() {
    // serde_json accepts and writes these; the number lexeme stops at `+`
    assert!(serde_json::from_str::<serde_json::Value>("1e+5").is_ok());
    assert_eq!(
        parse("[1.5e+300]").unwrap_err(),
        ParseError::MalformedLiteral {
            kind: TokenKind::Number,
            text: "1.5e".into(),
            position: 1,
        }
    );
    assert_eq!(parse("1.5e300").unwrap(), Value::Number(1.5e300));
}

#[test]
fn unquoted_key_is_unexpected_token() {
    let err = parse("{key: 1}").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            kind: TokenKind::Invalid,
            text: "k".into(),
            position: 1,
        }
    );
}

#[test]
fn empty_input_tokenizes_to_eof_only() {
    let tokens = tokenize("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(parse("").unwrap_err(), ParseError::UnexpectedEndOfInput);
}

#[test]
fn tokens_past_eof_stay_eof() {
    let mut lexer = Lexer::new("[]");
    lexer.next_token();
    lexer.next_token();
    for _ in 0..100 {
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

#[test]
fn token_text_is_always_a_slice_of_the_input() {
    let input = fixture("mixed.json");
    let base = input.as_ptr() as usize;
    for token in tokenize(&input) {
        let start = token.text.as_ptr() as usize - base;
        assert_eq!(&input[start..start + token.text.len()], token.text);
    }
}

#[test]
fn tokenizing_is_deterministic() {
    let input = fixture("glossary.json");
    assert_eq!(tokenize(&input), tokenize(&input));
    assert_eq!(parse(&input).unwrap(), parse(&input).unwrap());
}

#[test]
fn glossary_token_stream() {
    let input = fixture("glossary.json");
    let texts: Vec<&str> = tokenize(&input).into_iter().map(|t| t.text).collect();
    assert_eq!(texts.len(), 66);
    assert_eq!(&texts[..5], ["{", "\"glossary\"", ":", "{", "\"title\""]);
    assert_eq!(texts[texts.len() - 1], "");
    assert!(texts.contains(&"\"ISO 8879:1986\""));
}

#[test]
fn parses_glossary_fixture() {
    let value = parse(&fixture("glossary.json")).unwrap();
    let see_also = value
        .explore()
        .find_key("GlossSeeAlso")
        .get::<&[Value]>()
        .unwrap();
    assert_eq!(see_also, [string("GML"), string("XML")]);
}

#[test]
fn parses_mixed_fixture() {
    let value = parse(&fixture("mixed.json")).unwrap();
    let root = value.explore();

    assert_eq!(root.clone().field("name").get::<&str>(), Ok("sample \"document\""));
    assert_eq!(root.clone().field("version").get::<u32>(), Ok(3));
    assert_eq!(root.clone().field("ratio").get::<f64>(), Ok(-0.25));
    assert_eq!(root.clone().field("tiny").get::<f64>(), Ok(6.02e-23));
    assert_eq!(root.clone().field("missing").get::<Option<bool>>(), Ok(None));
    assert_eq!(
        root.clone().field("tags").at(3).get::<&str>(),
        Ok("emoji \u{1F600}")
    );
    assert_eq!(
        root.clone().field("escapes").get::<&str>(),
        Ok("tab\tnewline\nslash/backslash\\")
    );
    assert_eq!(
        root.clone().traverse(["matrix"]).at(1).at(0).get::<i64>(),
        Ok(3)
    );
    assert_eq!(
        root.field("nested")
            .field("items")
            .at(1)
            .field("label")
            .get::<String>(),
        Ok("two".to_string())
    );
}

#[test]
fn strict_options_reject_leniencies() {
    let options = ParseOptions::strict();
    assert!(parse_with_options("[1,]", options).is_err());
    assert!(parse_with_options(r#"{"a":1,}"#, options).is_err());
    assert!(parse_with_options(r#""\x""#, options).is_err());
    assert!(parse_with_options(r#"{"a":[1,2]}"#, options).is_ok());
}

#[test]
fn lenient_escapes_apply_to_keys_too() {
    let options = ParseOptions::default().with_escapes(EscapePolicy::Lenient);
    let value = parse_with_options(r#"{"k\x": 1}"#, options).unwrap();
    assert_eq!(value.get(r#""k\x""#), Some(&Value::Number(1.0)));
}

#[test]
fn depth_limit_is_configurable() {
    let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
    assert!(matches!(
        parse(&deep).unwrap_err(),
        ParseError::NestingTooDeep { limit: 128, .. }
    ));
    let options = ParseOptions::default().with_max_depth(200);
    assert!(parse_with_options(&deep, options).is_ok());
}
