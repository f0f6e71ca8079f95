//! Unit tests for the properties text decoder.

use rstest::rstest;

use super::parse_properties;
use crate::PropsError;

fn pairs(text: &str) -> Vec<(String, String)> {
    parse_properties(text, "test").expect("valid properties text")
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_owned(), value.to_owned())
}

#[rstest]
#[case("a=1", pair("a", "1"))]
#[case("a = 1", pair("a", "1"))]
#[case("a:1", pair("a", "1"))]
#[case("a 1", pair("a", "1"))]
#[case("  \ta\t=\t1", pair("a", "1"))]
#[case("a", pair("a", ""))]
#[case("a=", pair("a", ""))]
#[case("a==1", pair("a", "=1"))]
#[case("a = 1  ", pair("a", "1  "))]
#[case("str.val = the answer", pair("str.val", "the answer"))]
fn splits_keys_from_values(#[case] text: &str, #[case] expected: (String, String)) {
    assert_eq!(pairs(text), [expected]);
}

#[rstest]
#[case(r"a\=b=c", pair("a=b", "c"))]
#[case(r"a\ b=c", pair("a b", "c"))]
#[case(r"a=tab\there", pair("a", "tab\there"))]
#[case(r"a=caf\u00e9", pair("a", "café"))]
#[case(r"a=\ud83d\ude00", pair("a", "\u{1F600}"))]
#[case(r"a=\q", pair("a", "q"))]
#[case(r"a=C:\\dir", pair("a", r"C:\dir"))]
#[case(r"a=\${x}", pair("a", "${x}"))]
fn decodes_escapes(#[case] text: &str, #[case] expected: (String, String)) {
    assert_eq!(pairs(text), [expected]);
}

#[test]
fn skips_comments_and_blank_lines() {
    let text = "# heading\n! bang\n\n   \nkey=value\n  # indented comment\n";
    assert_eq!(pairs(text), [pair("key", "value")]);
}

#[test]
fn joins_continuation_lines() {
    let text = "list = a,\\\n       b,\\\n       c\nnext=1";
    assert_eq!(pairs(text), [pair("list", "a,b,c"), pair("next", "1")]);
}

#[test]
fn even_backslashes_do_not_continue() {
    let text = "path=C:\\\\\nnext=1";
    assert_eq!(pairs(text), [pair("path", "C:\\"), pair("next", "1")]);
}

#[test]
fn accepts_all_line_endings_and_keeps_duplicates() {
    let text = "a=1\r\nb=2\rc=3\na=4";
    assert_eq!(
        pairs(text),
        [pair("a", "1"), pair("b", "2"), pair("c", "3"), pair("a", "4")]
    );
}

#[rstest]
#[case("a=\\u12", 1)]
#[case("x=1\nbad=\\uzzzz", 2)]
#[case("x=1\n\nbad=\\ud83d", 3)]
fn reports_malformed_unicode_escapes(#[case] text: &str, #[case] expected_line: usize) {
    let err = parse_properties(text, "file:app.properties").expect_err("malformed escape");
    match err {
        PropsError::PropertiesSyntax { origin, line, .. } => {
            assert_eq!(origin, "file:app.properties");
            assert_eq!(line, expected_line);
        }
        other => panic!("expected PropertiesSyntax, got {other:?}"),
    }
}
