//! Demo application assembling its settings with `accrete`.
//!
//! Defaults are overlaid by `HELLO_*` environment variables, then an
//! optional `hello.json` file, then the command line.

use std::sync::Arc;

use accrete::{
    Accumulator, AccreteError, ArgvConfig, Entry, Environment, MergeOptions, SubCommand,
};
use camino::Utf8PathBuf;
use clap::{Arg, ArgAction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment variables read by the demo.
pub const ENV_PREFIX: &str = "HELLO_";

/// Boolean settings that environment variables may switch with
/// `true`/`false`.
const FLAG_KEYS: [&str; 3] = ["excited", "debug", "silent"];

/// Errors raised by the demo.
#[derive(Debug, Error)]
pub enum HelloError {
    /// Settings could not be accumulated.
    #[error("failed to load settings: {0}")]
    Settings(#[from] Arc<AccreteError>),
    /// The recipient collapsed to nothing after trimming.
    #[error("recipient must contain visible characters")]
    BlankRecipient,
}

/// Which greeting the user asked for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Say hello.
    Greet,
    /// Say goodbye.
    TakeLeave,
}

/// Fully merged demo settings.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Who to address.
    pub recipient: String,
    /// Appended to the greeting.
    pub punctuation: String,
    /// Shout the greeting.
    pub excited: bool,
    /// Enable debug logging.
    pub debug: bool,
    /// Suppress all output.
    pub silent: bool,
    /// Selected subcommand.
    pub cmd: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recipient: "World".to_owned(),
            punctuation: "!".to_owned(),
            excited: false,
            debug: false,
            silent: false,
            cmd: Mode::Greet,
        }
    }
}

impl Settings {
    /// Render the message these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`HelloError::BlankRecipient`] when the recipient is blank.
    pub fn message(&self) -> Result<String, HelloError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(HelloError::BlankRecipient);
        }
        let salutation = match self.cmd {
            Mode::Greet => "Hello",
            Mode::TakeLeave => "Goodbye",
        };
        let message = format!("{salutation}, {recipient}{}", self.punctuation);
        Ok(if self.excited {
            message.to_uppercase()
        } else {
            message
        })
    }
}

/// Inputs the demo reads from.
#[derive(Debug, Default)]
pub struct Inputs {
    /// Environment table; the process environment when `Process`.
    pub environment: Environment,
    /// Settings file path.
    pub config_path: Option<Utf8PathBuf>,
    /// Command-line tokens without the program name; the process
    /// arguments when `None`.
    pub tokens: Option<Vec<String>>,
}

// Environment values arrive as strings.
fn parse_env_flag((key, value): Entry) -> Entry {
    if !FLAG_KEYS.contains(&key.as_str()) {
        return (key, value);
    }
    let value = match value.as_str().map(str::parse::<bool>) {
        Some(Ok(flag)) => serde_json::Value::Bool(flag),
        _ => value,
    };
    (key, value)
}

// Flags absent from the command line parse as `false` and must not mask
// lower layers.
fn is_unset_flag(key: &str, value: &serde_json::Value) -> bool {
    FLAG_KEYS.contains(&key) && *value == serde_json::Value::Bool(false)
}

fn recipient_options(command: clap::Command) -> clap::Command {
    command
        .arg(
            Arg::new("recipient")
                .short('r')
                .long("recipient")
                .help("Who to address"),
        )
        .arg(
            Arg::new("is-excited")
                .short('x')
                .long("excited")
                .help("Shout the greeting")
                .action(ArgAction::SetTrue),
        )
}

fn argv_config(tokens: Option<Vec<String>>) -> ArgvConfig {
    let config = ArgvConfig::new("hello-settings")
        .version(env!("CARGO_PKG_VERSION"))
        .description("Greets someone using layered settings")
        .epilog("Settings: defaults < HELLO_* variables < hello.json < flags")
        .cmd(serde_json::json!("greet"))
        .options(|c| {
            recipient_options(c).arg(
                Arg::new("punctuation")
                    .short('p')
                    .long("punctuation")
                    .help("Text appended to the greeting"),
            )
        })
        .subcommand(
            SubCommand::new("take-leave", "take-leave")
                .description("Say goodbye instead")
                .options(recipient_options),
        );
    match tokens {
        Some(tokens) => config.tokens(tokens),
        None => config,
    }
}

/// Accumulate the demo settings from `inputs`.
///
/// # Errors
///
/// Returns [`HelloError::Settings`] when any source fails or the merged
/// settings do not describe a valid [`Settings`].
pub async fn load(inputs: Inputs) -> Result<Settings, HelloError> {
    let defaults = Accumulator::from_defaults(&Settings::default())?.snapshot();
    let settings = Accumulator::builder(defaults)
        .environment(inputs.environment)
        .build();
    let rename_excited = |(key, value): Entry| {
        if key == "isExcited" {
            ("excited".to_owned(), value)
        } else {
            (key, value)
        }
    };
    settings
        .env(
            ENV_PREFIX,
            MergeOptions::new().transform(parse_env_flag).exclude(["cmd"]),
        )
        .json(
            inputs
                .config_path
                .unwrap_or_else(|| Utf8PathBuf::from("hello.json")),
            MergeOptions::new().include(["recipient", "punctuation", "excited"]),
        )
        .argv(
            argv_config(inputs.tokens),
            MergeOptions::new()
                .transform(rename_excited)
                .filter(|(key, value)| !is_unset_flag(key, value)),
        );
    let settled = settings.done().await?;
    tracing::debug!(settings = ?settled.snapshot(), "settings accumulated");
    Ok(settled.extract()?)
}
