//! Environment variable source.
//!
//! Only keys beginning with the declared prefix contribute. The prefix is
//! matched exactly (no case folding) and stripped, and the remainder is
//! converted to camel case, so `APP_LOG_LEVEL` under prefix `APP_` becomes
//! `logLevel`. Values stay strings.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::case::{camel_case, strip_prefix};
use crate::options::Entry;

/// Environment table consulted by the environment source.
///
/// The default reads the live process environment each time an environment
/// step runs, never when the accumulator is built. Inject a fixed table for
/// isolation.
///
/// # Examples
///
/// ```rust
/// use accrete::Environment;
///
/// let env = Environment::fixed([("APP_PORT", "8080")]);
/// assert_eq!(env.snapshot().get("APP_PORT").map(String::as_str), Some("8080"));
/// ```
#[derive(Clone, Debug, Default)]
pub enum Environment {
    /// The process-wide environment, read at step time.
    #[default]
    Process,
    /// A fixed table.
    Fixed(Arc<BTreeMap<String, String>>),
}

impl Environment {
    /// Build a fixed environment table from key/value pairs.
    #[must_use]
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(Arc::new(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    /// Take a snapshot of the table.
    ///
    /// Process variables whose key or value is not valid Unicode are
    /// skipped.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        match self {
            Self::Process => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            Self::Fixed(table) => table.as_ref().clone(),
        }
    }
}

/// Select the entries of `environment` whose key starts with `prefix`.
///
/// Keys are returned unmodified; a key equal to the prefix is skipped as it
/// would normalise to an empty setting name.
pub(crate) fn read(environment: &Environment, prefix: &str) -> Vec<Entry> {
    let entries: Vec<Entry> = environment
        .snapshot()
        .into_iter()
        .filter(|(key, _)| strip_prefix(key, prefix).is_some_and(|rest| !rest.is_empty()))
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    tracing::debug!(prefix, matched = entries.len(), "read environment");
    entries
}

/// Transform stripping `prefix` and camel-casing the remainder of each key.
pub(crate) fn normaliser(prefix: String) -> impl Fn(Entry) -> Entry + Send + Sync + 'static {
    move |(key, value): Entry| {
        let name = camel_case(strip_prefix(&key, &prefix).unwrap_or(&key));
        (name, value)
    }
}
