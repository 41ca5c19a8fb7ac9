//! Primary error enum for settings accumulation.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
///
/// Errors are reference counted so that a single failing chain step can be
/// reported to every caller awaiting [`crate::Accumulator::done`].
pub type AccreteResult<T> = Result<T, Arc<AccreteError>>;

/// Errors that can occur while accumulating settings.
///
/// A missing JSON settings file is not an error: the JSON source treats it
/// as an empty object and never constructs a variant for it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccreteError {
    /// Reading a settings file failed for a reason other than absence.
    #[error("failed to read settings file '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error reported by the file system.
        #[source]
        source: std::io::Error,
    },

    /// A settings file did not contain valid JSON.
    #[error("malformed JSON in '{path}': {source}")]
    Json {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Error parsing command-line arguments.
    #[error("failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// The argument source was configured with neither a root command nor
    /// any subcommands.
    #[error("argument source requires either `cmd` or at least one subcommand")]
    MissingCommand,

    /// A mapping expected to be an object was some other JSON value.
    #[error("{origin} must be a JSON object, found {found}")]
    NotAnObject {
        /// Where the mapping came from.
        origin: String,
        /// JSON type name of the value that was supplied.
        found: &'static str,
    },

    /// Serialising a caller-supplied mapping into JSON failed.
    #[error("failed to serialise {origin}: {source}")]
    Serialize {
        /// Where the mapping came from.
        origin: String,
        /// Underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// Deserialising the accumulated settings into a typed value failed.
    #[error("failed to extract settings: {0}")]
    Extract(#[source] serde_json::Error),
}

impl AccreteError {
    /// Returns the JSON type name of `value`, used in [`Self::NotAnObject`].
    #[must_use]
    pub const fn json_type_name(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        }
    }

    /// Construct a [`Self::NotAnObject`] error for `value`.
    #[must_use]
    pub fn not_an_object(origin: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            origin: origin.into(),
            found: Self::json_type_name(value),
        }
    }
}
