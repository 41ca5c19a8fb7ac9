//! The chained settings accumulator.
//!
//! An [`Accumulator`] owns a live settings map and a chain of pending merge
//! steps. `env`, `json` and `argv` append a step to the chain and return
//! immediately; each step waits for its predecessor to settle, so merges
//! land in declaration order no matter how quickly each source responds.
//! The first failing step poisons the rest of the chain: later steps are
//! skipped and [`Accumulator::done`] reports that failure.
//!
//! `update` bypasses the chain and merges immediately. When steps are still
//! in flight it races with them; the settings map is only ever locked for
//! the duration of a single merge.
//!
//! When a step is enqueued from within a Tokio runtime the chain is spawned
//! onto that runtime and makes progress on its own. Outside a runtime the
//! chain runs when [`Accumulator::done`] is awaited. The default
//! [`crate::TokioFileSystem`] still needs a runtime, so `json` steps polled
//! from another executor fail with [`AccreteError::File`]; inject a
//! different [`FileSystem`] through [`Accumulator::builder`] to avoid that.

mod builder;

use std::future::Future;
use std::sync::Arc;

use camino::Utf8PathBuf;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use builder::AccumulatorBuilder;

use crate::fs::FileSystem;
use crate::options::{Entry, MergeOptions, merge_entries, process};
use crate::source::{SourceKind, argv, env, json};
use crate::{AccreteError, AccreteResult, ArgvConfig, Environment};

type Settings = Map<String, Value>;
type Link = Shared<BoxFuture<'static, AccreteResult<()>>>;

fn settled() -> Link {
    futures::future::ready(Ok(())).boxed().shared()
}

/// Mutable settings built up from an ordered chain of sources.
///
/// Cloning an accumulator yields another handle onto the same settings and
/// chain; [`Self::ptr_eq`] tells handles apart.
///
/// # Examples
///
/// ```rust
/// use accrete::{Accumulator, Environment, MergeOptions};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), std::sync::Arc<accrete::AccreteError>> {
/// let settings = Accumulator::builder([("port".to_owned(), json!(80))].into_iter().collect())
///     .environment(Environment::fixed([("APP_PORT", "8080"), ("OTHER", "x")]))
///     .build();
/// settings
///     .env("APP_", MergeOptions::new())
///     .json("/nonexistent/settings.json", MergeOptions::new());
///
/// let done = settings.done().await?;
/// assert_eq!(done.get("port"), Some(json!("8080")));
/// assert!(done.ptr_eq(&settings));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Accumulator {
    settings: Arc<Mutex<Settings>>,
    chain: Arc<Mutex<Link>>,
    environment: Environment,
    fs: Arc<dyn FileSystem>,
}

impl Accumulator {
    /// Create an accumulator seeded with `defaults`, reading the process
    /// environment and the local file system.
    #[must_use]
    pub fn new(defaults: Map<String, Value>) -> Self {
        Self::builder(defaults).build()
    }

    /// Create an accumulator seeded from any serialisable value.
    ///
    /// # Errors
    ///
    /// Returns [`AccreteError::Serialize`] when `defaults` cannot be
    /// serialised and [`AccreteError::NotAnObject`] when it does not
    /// serialise to an object.
    pub fn from_defaults<T>(defaults: &T) -> AccreteResult<Self>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self::new(to_object(defaults, "defaults")?))
    }

    /// Start configuring an accumulator with injected collaborators.
    #[must_use]
    pub fn builder(defaults: Map<String, Value>) -> AccumulatorBuilder {
        AccumulatorBuilder::new(defaults)
    }

    /// Queue a merge of environment variables starting with `prefix`.
    ///
    /// The prefix is stripped and the rest of each key camel-cased before
    /// `opts` is applied. Use `""` to consider every variable.
    pub fn env(&self, prefix: impl Into<String>, opts: MergeOptions) -> &Self {
        let prefix = prefix.into();
        let environment = self.environment.clone();
        let opts = opts.with_normaliser(env::normaliser(prefix.clone()));
        self.enqueue(SourceKind::Environment, opts, async move {
            Ok(env::read(&environment, &prefix))
        })
    }

    /// Queue a merge of the top-level keys of the JSON file at `path`.
    ///
    /// A missing file contributes nothing; other failures reject the chain.
    pub fn json(&self, path: impl Into<Utf8PathBuf>, opts: MergeOptions) -> &Self {
        let path = path.into();
        let fs = Arc::clone(&self.fs);
        self.enqueue(SourceKind::Json, opts, async move {
            json::read(fs.as_ref(), &path).await
        })
    }

    /// Queue a merge of parsed command-line arguments.
    ///
    /// Argument ids are camel-cased before `opts` is applied. A
    /// configuration without a root command or subcommands rejects the
    /// chain without parsing.
    pub fn argv(&self, config: ArgvConfig, opts: MergeOptions) -> &Self {
        let opts = opts.with_normaliser(argv::normalise);
        self.enqueue(SourceKind::Argv, opts, async move { argv::parse(&config) })
    }

    /// Merge `mapping` immediately, bypassing the chain.
    ///
    /// # Errors
    ///
    /// Returns [`AccreteError::Serialize`] or [`AccreteError::NotAnObject`]
    /// when `mapping` is not an object. The accumulator is left untouched.
    pub fn update<T>(&self, mapping: &T, opts: &MergeOptions) -> AccreteResult<&Self>
    where
        T: Serialize + ?Sized,
    {
        let entries = to_object(mapping, "update mapping")?;
        let written = merge_entries(&mut self.settings.lock(), process(entries, opts));
        tracing::debug!(source = %SourceKind::Direct, written, "merged settings");
        Ok(self)
    }

    /// Wait for every step queued so far, resolving to this accumulator.
    ///
    /// Steps queued after this call are not awaited. The returned future
    /// fails with the first error raised by the chain.
    pub fn done(&self) -> impl Future<Output = AccreteResult<Self>> + Send + 'static {
        let tail = self.chain.lock().clone();
        let this = self.clone();
        async move { tail.await.map(|()| this) }
    }

    /// Copy of the current settings.
    ///
    /// While steps are pending this is a best-effort view.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.settings.lock().clone()
    }

    /// Current value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings.lock().get(key).cloned()
    }

    /// Deserialise the current settings into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`AccreteError::Extract`] when the settings do not match `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> AccreteResult<T> {
        serde_json::from_value(Value::Object(self.snapshot()))
            .map_err(|e| Arc::new(AccreteError::Extract(e)))
    }

    /// Whether `self` and `other` are handles onto the same settings.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.settings, &other.settings)
    }

    fn enqueue<F>(&self, kind: SourceKind, opts: MergeOptions, read: F) -> &Self
    where
        F: Future<Output = AccreteResult<Vec<Entry>>> + Send + 'static,
    {
        let settings = Arc::clone(&self.settings);
        let mut chain = self.chain.lock();
        let previous = chain.clone();
        let step = async move {
            previous.await?;
            let entries = read.await.inspect_err(|err| {
                tracing::warn!(source = %kind, error = %err, "settings step failed");
            })?;
            let written = merge_entries(&mut settings.lock(), process(entries, &opts));
            tracing::debug!(source = %kind, written, "merged settings");
            Ok::<(), Arc<AccreteError>>(())
        }
        .boxed()
        .shared();
        *chain = step.clone();
        drop(chain);

        tracing::debug!(source = %kind, "queued settings step");
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            drop(runtime.spawn(step));
        }
        self
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator")
            .field("settings", &*self.settings.lock())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

fn to_object<T>(value: &T, origin: &str) -> AccreteResult<Map<String, Value>>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| {
        Arc::new(AccreteError::Serialize {
            origin: origin.to_owned(),
            source,
        })
    })?;
    json::object(value, || origin.to_owned())
}
