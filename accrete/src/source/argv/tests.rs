//! Unit tests for the clap-driven argument source.

use super::*;
use crate::options::{MergeOptions, process};
use clap::{Arg, value_parser};
use rstest::{fixture, rstest};
use serde_json::{Map, json};

fn foo_flags(command: Command) -> Command {
    command
        .arg(
            Arg::new("foo")
                .short('f')
                .long("foo")
                .value_parser(value_parser!(i64)),
        )
        .arg(Arg::new("foo-bar").short('b').long("foo-bar"))
}

#[fixture]
fn root() -> ArgvConfig {
    ArgvConfig::new("demo").cmd("root").options(foo_flags)
}

fn settings(config: &ArgvConfig) -> Map<String, Value> {
    let entries = parse(config).expect("tokens parse");
    let opts = MergeOptions::new().with_normaliser(normalise);
    process(entries, &opts).into_iter().collect()
}

#[rstest]
fn parses_declared_flags_with_defaults(root: ArgvConfig) {
    let config = root.tokens(["--foo", "2", "--foo-bar", "3"]);
    assert_eq!(
        Value::Object(settings(&config)),
        json!({
            "foo": 2,
            "fooBar": "3",
            "cmd": "root",
            "debug": false,
            "silent": false,
        })
    );
}

#[rstest]
#[case::long(&["--debug", "--silent"])]
#[case::short(&["-d", "-s"])]
#[case::bundled(&["-ds"])]
fn default_flags_are_registered(root: ArgvConfig, #[case] tokens: &[&str]) {
    let parsed = settings(&root.tokens(tokens.iter().copied()));
    assert_eq!(parsed.get("debug"), Some(&json!(true)));
    assert_eq!(parsed.get("silent"), Some(&json!(true)));
}

#[rstest]
fn absent_options_are_omitted(root: ArgvConfig) {
    let parsed = settings(&root.tokens(Vec::<String>::new()));
    assert!(!parsed.contains_key("foo"));
    assert!(!parsed.contains_key("fooBar"));
    assert_eq!(parsed.get("cmd"), Some(&json!("root")));
}

#[test]
fn appended_values_become_arrays() {
    let config = ArgvConfig::new("demo")
        .cmd(1)
        .options(|c| c.arg(Arg::new("tag").long("tag").action(ArgAction::Append)))
        .tokens(["--tag", "a", "--tag", "b"]);
    assert_eq!(settings(&config).get("tag"), Some(&json!(["a", "b"])));
}

#[test]
fn counted_flags_become_numbers() {
    let config = ArgvConfig::new("demo")
        .cmd(1)
        .options(|c| c.arg(Arg::new("verbose").short('v').action(ArgAction::Count)))
        .tokens(["-vvv"]);
    assert_eq!(settings(&config).get("verbose"), Some(&json!(3)));
}

#[test]
fn path_values_render_as_strings() {
    let config = ArgvConfig::new("demo")
        .cmd(1)
        .options(|c| {
            c.arg(
                Arg::new("config_path")
                    .long("config")
                    .value_parser(value_parser!(PathBuf)),
            )
        })
        .tokens(["--config", "settings.json"]);
    assert_eq!(
        settings(&config).get("configPath"),
        Some(&json!("settings.json"))
    );
}

fn with_subcommands() -> ArgvConfig {
    ArgvConfig::new("registry")
        .options(|c| c.arg(Arg::new("root-only").long("root-only")))
        .subcommand(
            SubCommand::new("push", json!({"action": "push"}))
                .description("Upload an image")
                .options(|c| c.arg(Arg::new("tag-name").long("tag-name"))),
        )
        .subcommand(SubCommand::new("pull", "pull"))
}

#[test]
fn selected_subcommand_parses_only_its_own_options() {
    let parsed = settings(&with_subcommands().tokens(["push", "--tag-name", "latest", "-d"]));
    assert_eq!(
        Value::Object(parsed),
        json!({
            "tagName": "latest",
            "debug": true,
            "silent": false,
            "cmd": {"action": "push"},
        })
    );
}

#[rstest]
#[case::debug_before(&["-d", "push", "--tag-name", "x"], true, false)]
#[case::silent_before(&["--silent", "push", "--tag-name", "x"], false, true)]
#[case::split(&["-d", "push", "-s", "--tag-name", "x"], true, true)]
#[case::none(&["push", "--tag-name", "x"], false, false)]
fn default_flags_before_subcommand_are_kept(
    #[case] tokens: &[&str],
    #[case] debug: bool,
    #[case] silent: bool,
) {
    let parsed = settings(&with_subcommands().tokens(tokens.iter().copied()));
    assert_eq!(
        Value::Object(parsed),
        json!({
            "tagName": "x",
            "debug": debug,
            "silent": silent,
            "cmd": {"action": "push"},
        })
    );
}

#[test]
fn subcommand_rejects_root_options() {
    let config = with_subcommands().tokens(["pull", "--root-only", "x"]);
    let err = parse(&config).expect_err("root option after subcommand");
    assert!(matches!(&*err, AccreteError::CliParsing(_)));
}

#[test]
fn subcommands_without_root_require_a_selection() {
    let err = parse(&with_subcommands().tokens(Vec::<String>::new()))
        .expect_err("subcommand required");
    assert!(matches!(&*err, AccreteError::CliParsing(_)));
}

#[test]
fn root_value_applies_when_no_subcommand_is_chosen() {
    let parsed = settings(&with_subcommands().cmd("root").tokens(["--root-only", "x"]));
    assert_eq!(parsed.get("cmd"), Some(&json!("root")));
    assert_eq!(parsed.get("rootOnly"), Some(&json!("x")));
}

#[test]
fn missing_command_is_a_configuration_error() {
    let err = parse(&ArgvConfig::new("demo").tokens(["--debug"])).expect_err("no command");
    assert!(matches!(&*err, AccreteError::MissingCommand));
}

#[rstest]
#[case::help(&["--help"], clap::error::ErrorKind::DisplayHelp)]
#[case::version(&["--version"], clap::error::ErrorKind::DisplayVersion)]
#[case::unknown(&["--nope"], clap::error::ErrorKind::UnknownArgument)]
#[case::invalid(&["--foo", "two"], clap::error::ErrorKind::ValueValidation)]
fn parser_failures_surface_as_cli_errors(
    root: ArgvConfig,
    #[case] tokens: &[&str],
    #[case] kind: clap::error::ErrorKind,
) {
    let config = root.version("1.2.3").tokens(tokens.iter().copied());
    let err = parse(&config).expect_err("parse failure");
    let clap_err = err.as_clap().expect("clap error");
    assert_eq!(clap_err.kind(), kind);
}

#[rstest]
fn help_flag_can_be_disabled(root: ArgvConfig) {
    let err = parse(&root.help(false).tokens(["--help"])).expect_err("unknown --help");
    let clap_err = err.as_clap().expect("clap error");
    assert_eq!(clap_err.kind(), clap::error::ErrorKind::UnknownArgument);
}
