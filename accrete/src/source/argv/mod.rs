//! Command-line argument source driven by `clap`.
//!
//! The source builds a [`clap::Command`] from an [`ArgvConfig`], parses the
//! token list and turns every present argument into an entry. Two boolean
//! flags, `-d/--debug` and `-s/--silent`, are always registered, and a
//! `cmd` entry records the value attached to the command that matched.
//!
//! Values keep the type `clap` parsed them into: flags become booleans,
//! integer and float parsers become numbers and everything else becomes a
//! string. Arguments accepting several values become arrays.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::case::camel_case;
use crate::options::Entry;
use crate::{AccreteError, AccreteResult, AccreteResultExt};

/// Callback registering additional arguments on a command.
pub type OptionInstaller = Arc<dyn Fn(Command) -> Command + Send + Sync>;

/// Key under which the matched command's value is stored.
pub const CMD_KEY: &str = "cmd";

const DEFAULT_FLAGS: [&str; 2] = ["debug", "silent"];

/// Description of a named subcommand.
#[derive(Clone)]
pub struct SubCommand {
    name: String,
    description: Option<String>,
    options: Option<OptionInstaller>,
    cmd: Value,
}

impl SubCommand {
    /// Create a subcommand called `name` whose selection yields `cmd`.
    #[must_use]
    pub fn new(name: impl Into<String>, cmd: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            description: None,
            options: None,
            cmd: cmd.into(),
        }
    }

    /// Set the text shown for this subcommand in help output.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register the arguments this subcommand accepts.
    #[must_use]
    pub fn options<F>(mut self, install: F) -> Self
    where
        F: Fn(Command) -> Command + Send + Sync + 'static,
    {
        self.options = Some(Arc::new(install));
        self
    }

    fn build(&self, help: bool) -> Command {
        let mut command = with_default_flags(Command::new(self.name.clone()));
        if let Some(description) = &self.description {
            command = command.about(description.clone());
        }
        if !help {
            command = command.disable_help_flag(true);
        }
        match &self.options {
            Some(install) => install(command),
            None => command,
        }
    }
}

impl fmt::Debug for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options.is_some())
            .field("cmd", &self.cmd)
            .finish()
    }
}

/// Configuration for the argument source.
///
/// Either a root command value ([`Self::cmd`]) or at least one
/// [`SubCommand`] is required; without both the step fails with
/// [`AccreteError::MissingCommand`] before any parsing happens.
///
/// # Examples
///
/// ```rust
/// use accrete::{ArgvConfig, SubCommand};
/// use clap::Arg;
///
/// let config = ArgvConfig::new("registry")
///     .version("1.0.0")
///     .subcommand(SubCommand::new("push", "push").options(|c| c.arg(Arg::new("tag").long("tag"))))
///     .tokens(["push", "--tag", "latest"]);
/// assert!(config.has_command());
/// ```
#[derive(Clone)]
pub struct ArgvConfig {
    name: String,
    version: Option<String>,
    description: Option<String>,
    epilog: Option<String>,
    help: bool,
    cmd: Option<Value>,
    sub_cmds: Vec<SubCommand>,
    options: Option<OptionInstaller>,
    tokens: Option<Vec<OsString>>,
}

impl ArgvConfig {
    /// Create a configuration for a program called `name`.
    ///
    /// Help flags are enabled and tokens default to the process arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
            epilog: None,
            help: true,
            cmd: None,
            sub_cmds: Vec::new(),
            options: None,
            tokens: None,
        }
    }

    /// Version reported by `--version`.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Text shown above the argument list in help output.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text shown after the argument list in help output.
    #[must_use]
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    /// Enable or disable the `-h/--help` flag.
    #[must_use]
    pub const fn help(mut self, enabled: bool) -> Self {
        self.help = enabled;
        self
    }

    /// Value recorded under `cmd` when no subcommand is selected.
    #[must_use]
    pub fn cmd(mut self, cmd: impl Into<Value>) -> Self {
        self.cmd = Some(cmd.into());
        self
    }

    /// Add a named subcommand.
    #[must_use]
    pub fn subcommand(mut self, sub_cmd: SubCommand) -> Self {
        self.sub_cmds.push(sub_cmd);
        self
    }

    /// Register additional arguments on the root command.
    #[must_use]
    pub fn options<F>(mut self, install: F) -> Self
    where
        F: Fn(Command) -> Command + Send + Sync + 'static,
    {
        self.options = Some(Arc::new(install));
        self
    }

    /// Parse `tokens` instead of the process arguments.
    ///
    /// Tokens exclude the program name.
    #[must_use]
    pub fn tokens<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a root command value or at least one subcommand is present.
    #[must_use]
    pub fn has_command(&self) -> bool {
        self.cmd.is_some() || !self.sub_cmds.is_empty()
    }

    fn build(&self) -> Command {
        let mut root = with_default_flags(Command::new(self.name.clone()));
        if let Some(version) = &self.version {
            root = root.version(version.clone());
        }
        if let Some(description) = &self.description {
            root = root.about(description.clone());
        }
        if let Some(epilog) = &self.epilog {
            root = root.after_help(epilog.clone());
        }
        if !self.help {
            root = root.disable_help_flag(true).disable_help_subcommand(true);
        }
        if let Some(install) = &self.options {
            root = install(root);
        }
        for sub_cmd in &self.sub_cmds {
            root = root.subcommand(sub_cmd.build(self.help));
        }
        if self.cmd.is_none() {
            root = root.subcommand_required(true);
        }
        root
    }

    fn argv(&self) -> Vec<OsString> {
        match &self.tokens {
            Some(tokens) => std::iter::once(OsString::from(self.name.clone()))
                .chain(tokens.iter().cloned())
                .collect(),
            None => std::env::args_os().collect(),
        }
    }
}

impl fmt::Debug for ArgvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgvConfig")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("help", &self.help)
            .field("cmd", &self.cmd)
            .field("sub_cmds", &self.sub_cmds)
            .field("options", &self.options.is_some())
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

fn with_default_flags(command: Command) -> Command {
    let [debug, silent] = DEFAULT_FLAGS;
    command
        .arg(
            clap::Arg::new(debug)
                .short('d')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new(silent)
                .short('s')
                .long("silent")
                .help("Suppress output")
                .action(ArgAction::SetTrue),
        )
}

/// Flags given before a subcommand name land in the root matches; carry
/// them over to the subcommand's entries.
fn lift_root_flags(entries: &mut [Entry], root: &ArgMatches) {
    for (key, value) in entries.iter_mut() {
        if DEFAULT_FLAGS.contains(&key.as_str()) && root.get_flag(key) {
            *value = Value::Bool(true);
        }
    }
}

/// Parse the configured tokens into raw entries.
///
/// Keys are `clap` argument ids; camel-casing is left to [`normalise`].
///
/// # Errors
///
/// Returns [`AccreteError::MissingCommand`] when neither a root command nor
/// subcommands are configured, and [`AccreteError::CliParsing`] when `clap`
/// rejects the tokens (including `--help` and `--version` requests).
pub(crate) fn parse(config: &ArgvConfig) -> AccreteResult<Vec<Entry>> {
    if !config.has_command() {
        return Err(Arc::new(AccreteError::MissingCommand));
    }
    let mut root = config.build();
    let matches = root.try_get_matches_from_mut(config.argv()).into_accrete()?;

    let selected = matches.subcommand().and_then(|(name, sub_matches)| {
        let sub_cmd = config.sub_cmds.iter().find(|s| s.name == name)?;
        let command = root.find_subcommand(name)?;
        Some((sub_cmd.cmd.clone(), command, sub_matches))
    });
    let (cmd, command, mut entries) = match selected {
        Some((sub_cmd, command, chosen)) => {
            let mut sub_entries = collect(command, chosen);
            lift_root_flags(&mut sub_entries, &matches);
            (sub_cmd, command, sub_entries)
        }
        None => {
            let root_cmd = config.cmd.clone().ok_or(AccreteError::MissingCommand)?;
            (root_cmd, &root, collect(&root, &matches))
        }
    };

    entries.push((CMD_KEY.to_owned(), cmd));
    tracing::debug!(
        command = command.get_name(),
        arguments = entries.len(),
        "parsed command line"
    );
    Ok(entries)
}

/// Camel-case an argument id.
pub(crate) fn normalise((key, value): Entry) -> Entry {
    (camel_case(&key), value)
}

fn collect(command: &Command, matches: &ArgMatches) -> Vec<Entry> {
    command
        .get_arguments()
        .filter(|arg| matches.contains_id(arg.get_id().as_str()))
        .filter_map(|arg| {
            let id = arg.get_id().as_str();
            let many = matches!(arg.get_action(), ArgAction::Append)
                || arg.get_num_args().is_some_and(|range| range.max_values() > 1);
            value_of(matches, id, many).map(|value| (id.to_owned(), value))
        })
        .collect()
}

fn value_of(matches: &ArgMatches, id: &str, many: bool) -> Option<Value> {
    typed::<bool>(matches, id, many)
        .or_else(|| typed::<String>(matches, id, many))
        .or_else(|| typed::<i64>(matches, id, many))
        .or_else(|| typed::<u64>(matches, id, many))
        .or_else(|| typed::<i32>(matches, id, many))
        .or_else(|| typed::<u32>(matches, id, many))
        .or_else(|| typed::<i16>(matches, id, many))
        .or_else(|| typed::<u16>(matches, id, many))
        .or_else(|| typed::<i8>(matches, id, many))
        .or_else(|| typed::<u8>(matches, id, many))
        .or_else(|| typed::<usize>(matches, id, many))
        .or_else(|| typed::<isize>(matches, id, many))
        .or_else(|| typed::<f64>(matches, id, many))
        .or_else(|| typed::<f32>(matches, id, many))
        .or_else(|| lossy::<PathBuf>(matches, id, many, |p| p.to_string_lossy().into_owned()))
        .or_else(|| lossy::<OsString>(matches, id, many, |s| s.to_string_lossy().into_owned()))
}

fn typed<T>(matches: &ArgMatches, id: &str, many: bool) -> Option<Value>
where
    T: Clone + Send + Sync + 'static,
    Value: From<T>,
{
    let values = matches.try_get_many::<T>(id).ok()??;
    shape(values.cloned().map(Value::from).collect(), many)
}

fn lossy<T>(matches: &ArgMatches, id: &str, many: bool, render: fn(&T) -> String) -> Option<Value>
where
    T: Clone + Send + Sync + 'static,
{
    let values = matches.try_get_many::<T>(id).ok()??;
    shape(values.map(|v| Value::String(render(v))).collect(), many)
}

fn shape(mut values: Vec<Value>, many: bool) -> Option<Value> {
    if many {
        Some(Value::Array(values))
    } else {
        values.pop()
    }
}

#[cfg(test)]
mod tests;
