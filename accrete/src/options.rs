//! Per-operation entry selection and transformation.
//!
//! Every merge, whether chained or immediate, funnels its candidate entries
//! through [`process`] before they reach the accumulator. A transform (if
//! any) runs first; exactly one selection strategy is then honoured, in the
//! precedence order `filter`, `exclude`, `include`.
//!
//! # Examples
//!
//! ```rust
//! use accrete::{MergeOptions, process};
//! use serde_json::json;
//!
//! let entries = vec![
//!     ("foo".to_owned(), json!(2)),
//!     ("bar".to_owned(), json!(3)),
//! ];
//! let opts = MergeOptions::new().filter(|(_, value)| *value != json!(3));
//! let kept = process(entries, &opts);
//! assert_eq!(kept, vec![("foo".to_owned(), json!(2))]);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A single key/value pair considered for merge.
pub type Entry = (String, Value);

type TransformFn = dyn Fn(Entry) -> Entry + Send + Sync;
type FilterFn = dyn Fn(&Entry) -> bool + Send + Sync;

/// Options shared by every merge operation.
///
/// All fields are optional. When several selection strategies are set, only
/// the highest-precedence one applies: `filter` beats `exclude`, which beats
/// `include`.
#[derive(Clone, Default)]
pub struct MergeOptions {
    transform: Option<Arc<TransformFn>>,
    filter: Option<Arc<FilterFn>>,
    include: Option<HashSet<String>>,
    exclude: Option<HashSet<String>>,
}

impl MergeOptions {
    /// Options that keep every entry unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every entry through `transform` before selection.
    ///
    /// Keys may collide after transformation; the later entry wins when
    /// merged.
    #[must_use]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Entry) -> Entry + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Keep only entries for which `filter` returns `true`.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Keep only entries whose (transformed) key is in `keys`.
    #[must_use]
    pub fn include<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.include = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Drop entries whose (transformed) key is in `keys`.
    #[must_use]
    pub fn exclude<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.exclude = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Run `normalise` ahead of any caller-supplied transform.
    ///
    /// Sources use this to install their key normalisation so caller
    /// transforms and key sets always see normalised keys.
    #[must_use]
    pub(crate) fn with_normaliser<F>(mut self, normalise: F) -> Self
    where
        F: Fn(Entry) -> Entry + Send + Sync + 'static,
    {
        let combined: Arc<TransformFn> = match self.transform.take() {
            Some(caller) => Arc::new(move |entry: Entry| caller(normalise(entry))),
            None => Arc::new(normalise),
        };
        self.transform = Some(combined);
        self
    }

    fn apply_transform(&self, entry: Entry) -> Entry {
        match &self.transform {
            Some(transform) => transform(entry),
            None => entry,
        }
    }

    fn keeps(&self, entry: &Entry) -> bool {
        if let Some(filter) = &self.filter {
            return filter(entry);
        }
        if let Some(exclude) = &self.exclude {
            return !exclude.contains(&entry.0);
        }
        if let Some(include) = &self.include {
            return include.contains(&entry.0);
        }
        true
    }
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("transform", &self.transform.is_some())
            .field("filter", &self.filter.is_some())
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .finish()
    }
}

/// Transform and select `entries` according to `opts`.
///
/// Order is preserved so that, when merged, later entries overwrite earlier
/// ones sharing a key.
#[must_use]
pub fn process<I>(entries: I, opts: &MergeOptions) -> Vec<Entry>
where
    I: IntoIterator<Item = Entry>,
{
    entries
        .into_iter()
        .map(|entry| opts.apply_transform(entry))
        .filter(|entry| opts.keeps(entry))
        .collect()
}

/// Overwrite `target` with `entries`, returning how many were written.
pub(crate) fn merge_entries(target: &mut Map<String, Value>, entries: Vec<Entry>) -> usize {
    let count = entries.len();
    for (key, value) in entries {
        target.insert(key, value);
    }
    count
}
