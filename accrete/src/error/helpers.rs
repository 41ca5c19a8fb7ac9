//! Helpers for classifying errors surfaced by the argument source.

use clap::{Error as ClapError, error::ErrorKind};

use super::AccreteError;

/// Whether a parse failure is really a `--help` or `--version` request.
///
/// An `argv` step never prints. It rejects the chain with
/// [`AccreteError::CliParsing`], so the request reaches the caller as the
/// error of [`crate::Accumulator::done`]. Pair this with
/// [`AccreteError::as_clap`] to print the rendered text and exit cleanly:
///
/// ```rust
/// use accrete::{Accumulator, ArgvConfig, MergeOptions, is_display_request};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let settings = Accumulator::new(serde_json::Map::new());
/// settings.argv(ArgvConfig::new("tool").cmd("run").tokens(["--help"]), MergeOptions::new());
/// let err = settings.done().await.expect_err("help short-circuits the chain");
/// assert!(err.as_clap().is_some_and(is_display_request));
/// # }
/// ```
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

impl AccreteError {
    /// Returns the wrapped [`clap::Error`] when this is a parse failure from
    /// the argument source.
    #[must_use]
    pub fn as_clap(&self) -> Option<&ClapError> {
        match self {
            Self::CliParsing(err) => Some(&**err),
            _ => None,
        }
    }
}
