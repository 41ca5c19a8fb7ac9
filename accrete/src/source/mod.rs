//! Source readers feeding the accumulator chain.
//!
//! Each reader produces raw entries; key normalisation is expressed as a
//! transform installed on the operation's [`crate::MergeOptions`] so that
//! caller transforms and key sets observe normalised keys.

pub mod argv;
pub mod env;
pub mod json;

use std::fmt;

/// Kind of source backing a merge step, used for diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SourceKind {
    /// Process environment or an injected environment table.
    Environment,
    /// A JSON settings file.
    Json,
    /// Parsed command-line arguments.
    Argv,
    /// A mapping applied immediately through `update`.
    Direct,
}

impl SourceKind {
    /// Short lowercase label for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::Json => "json",
            Self::Argv => "argv",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SourceKind::Environment, "env")]
    #[case(SourceKind::Json, "json")]
    #[case(SourceKind::Argv, "argv")]
    #[case(SourceKind::Direct, "direct")]
    fn displays_log_labels(#[case] kind: SourceKind, #[case] label: &str) {
        assert_eq!(kind.to_string(), label);
    }
}
