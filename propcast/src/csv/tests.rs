//! Unit tests for the CSV tokenizer.

use rstest::rstest;

use super::CsvTokenizer;

fn fields(line: &str) -> Vec<String> {
    CsvTokenizer::default()
        .split(line)
        .unwrap_or_else(|| panic!("expected fields for {line:?}"))
}

#[rstest]
#[case("a,b,c", &["a", "b", "c"])]
#[case("10,AU,Australia", &["10", "AU", "Australia"])]
#[case("\"10\",\"AU\",\"Australia\"", &["10", "AU", "Australia"])]
#[case("\"10\",\"AU\",\"Aus,tralia\"", &["10", "AU", "Aus,tralia"])]
#[case("\"10\",\"AU\",\"Aus\"\"tralia\"", &["10", "AU", "Aus\"tralia"])]
fn reads_plain_and_quoted_fields(#[case] line: &str, #[case] expected: &[&str]) {
    assert_eq!(fields(line), expected);
}

#[rstest]
#[case("10,AU,Aus\"tralia,foo", &["10", "AU", "Australia,foo"])]
#[case("10,AU,Aus\"\"tralia", &["10", "AU", "Australia"])]
#[case("a\"b,c\"\"d\"", &["ab,c\"d"])]
#[case("ab\"", &["ab"])]
#[case("a\"\"b,c", &["ab", "c"])]
#[case("a\"\"\"\"b,c", &["a\"b", "c"])]
#[case("a\"\"\"b,c", &["a\"b,c"])]
#[case("\"a\"b\",c", &["ab,c"])]
fn folds_unbalanced_quotes(#[case] line: &str, #[case] expected: &[&str]) {
    assert_eq!(fields(line), expected);
}

#[rstest]
#[case("a, b", &["a", "b"])]
#[case("10, AU,  Aus ,  Australia ", &["10", "AU", "Aus", "Australia"])]
#[case("a,\" b\",\"c \",\" d \"", &["a", " b", "c ", " d "])]
#[case("New  York, x", &["New  York", "x"])]
fn trims_unquoted_spaces(#[case] line: &str, #[case] expected: &[&str]) {
    assert_eq!(fields(line), expected);
}

#[rstest]
#[case("\n", &[""])]
#[case(" ", &[""])]
#[case(",", &["", ""])]
#[case(",,,", &["", "", "", ""])]
#[case("a,,", &["a", "", ""])]
#[case(",a,", &["", "a", ""])]
#[case(",,a", &["", "", "a"])]
fn keeps_empty_fields(#[case] line: &str, #[case] expected: &[&str]) {
    assert_eq!(fields(line), expected);
}

#[test]
fn empty_input_reads_nothing() {
    assert_eq!(CsvTokenizer::default().split(""), None);
}

#[test]
fn quoted_line_breaks_stay_in_the_field() {
    assert_eq!(fields("a\"\n\"b,c\r\nd"), ["a\nb", "c"]);
}

#[test]
fn reads_successive_lines() {
    let rows = CsvTokenizer::default().read_all("a,b\r\nc\n\"d\ne\",f");
    assert_eq!(
        rows,
        vec![
            vec!["a".to_owned(), "b".to_owned()],
            vec!["c".to_owned()],
            vec!["d\ne".to_owned(), "f".to_owned()],
        ]
    );
}

#[test]
fn honours_custom_separator_and_quote() {
    let csv = CsvTokenizer::new(';', '\'');
    assert_eq!(
        csv.split("a; 'b;c' ;d,e"),
        Some(vec!["a".to_owned(), "b;c".to_owned(), "d,e".to_owned()])
    );
}

#[rstest]
#[case(&["a", "b"])]
#[case(&["x,y", "1\"2\"3", "abc"])]
#[case(&["", "", ""])]
#[case(&[""])]
#[case(&[" padded ", "line\nbreak"])]
fn joined_fields_read_back_unchanged(#[case] input: &[&str]) {
    let csv = CsvTokenizer::default();
    let line = csv.join_fields(input);
    assert_eq!(fields(&line), input, "line was {line:?}");
}
