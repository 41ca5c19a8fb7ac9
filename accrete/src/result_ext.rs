//! Extensions for mapping errors to `AccreteResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `AccreteResult<T>` alias (`Result<T, Arc<AccreteError>>`).
//!
//! # Examples
//!
//! ```
//! use accrete::{AccreteResult, AccreteResultExt};
//!
//! fn parse(tokens: &[&str]) -> AccreteResult<clap::ArgMatches> {
//!     // clap::Error implements Into<AccreteError>
//!     clap::Command::new("demo").try_get_matches_from(tokens).into_accrete()
//! }
//!
//! assert!(parse(&["demo"]).is_ok());
//! assert!(parse(&["demo", "--nope"]).is_err());
//! ```

use std::sync::Arc;

use crate::{AccreteError, AccreteResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<AccreteError>` into an `AccreteResult<T>`.
pub trait AccreteResultExt<T, E> {
    /// Convert `Result<T, E>` into `AccreteResult<T>` using
    /// `Into<AccreteError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into
    /// `Arc<AccreteError>`.
    fn into_accrete(self) -> AccreteResult<T>;
}

impl<T, E> AccreteResultExt<T, E> for Result<T, E>
where
    E: Into<AccreteError>,
{
    fn into_accrete(self) -> AccreteResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
