//! Error types produced while accumulating settings.

mod conversions;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::{AccreteError, AccreteResult};

#[cfg(test)]
mod tests;
