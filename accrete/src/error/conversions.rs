//! Trait-based conversions between external error types and `AccreteError`.

use super::AccreteError;

impl From<clap::Error> for AccreteError {
    fn from(e: clap::Error) -> Self {
        Self::CliParsing(Box::new(e))
    }
}
