//! Unit tests for error construction and classification.

use rstest::rstest;

use super::PropsError;

#[rstest]
#[case(PropsError::unsupported("v", "Thing"), true)]
#[case(PropsError::invalid_value("abc", "u32", "invalid digit"), true)]
#[case(PropsError::argument("-=x", "leading `=`"), false)]
#[case(PropsError::grammar("a!", 1, "Bad arg-type char `!`"), false)]
fn classifies_conversion_errors(#[case] err: PropsError, #[case] expected: bool) {
    assert_eq!(err.is_conversion(), expected, "unexpected class for {err:?}");
}

#[test]
fn grammar_error_reports_position_and_spec() {
    let err = PropsError::grammar("a? b!", 4, "Bad arg-type char `!`");
    assert_eq!(
        err.to_string(),
        "Bad arg-type char `!` -- pos=4, spec=`a? b!`"
    );
}

#[test]
fn file_error_keeps_io_source() {
    use std::error::Error as _;

    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = PropsError::file(camino::Utf8Path::new("/etc/app.properties"), io);
    assert!(err.to_string().contains("/etc/app.properties"));
    assert!(err.source().is_some(), "I/O source should be chained");
}
