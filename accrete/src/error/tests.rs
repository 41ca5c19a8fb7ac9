//! Unit tests for error classification.

use clap::{Command, error::ErrorKind};
use rstest::rstest;
use serde_json::json;

use super::{AccreteError, is_display_request};

fn build_error(kind: ErrorKind) -> clap::Error {
    Command::new("demo").error(kind, "demo output")
}

#[rstest]
#[case(ErrorKind::DisplayHelp)]
#[case(ErrorKind::DisplayVersion)]
fn recognises_display_requests(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(is_display_request(&err));
}

#[rstest]
#[case(ErrorKind::UnknownArgument)]
#[case(ErrorKind::InvalidValue)]
fn rejects_regular_errors(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(!is_display_request(&err));
}

#[test]
fn clap_errors_convert_into_cli_parsing() {
    let err: AccreteError = build_error(ErrorKind::UnknownArgument).into();
    let clap_err = err.as_clap().expect("wrapped clap error");
    assert_eq!(clap_err.kind(), ErrorKind::UnknownArgument);
}

#[rstest]
#[case(json!(null), "null")]
#[case(json!([1, 2]), "an array")]
#[case(json!("text"), "a string")]
#[case(json!(3), "a number")]
fn not_an_object_names_the_found_type(#[case] value: serde_json::Value, #[case] found: &str) {
    let err = AccreteError::not_an_object("settings file", &value);
    assert_eq!(
        err.to_string(),
        format!("settings file must be a JSON object, found {found}")
    );
}
