//! Helpers for safely mutating the process environment in tests.
//!
//! Every mutation happens under a global re-entrant mutex and returns a
//! guard restoring the prior value on drop. Tests that read the whole
//! environment (as the accumulator's default environment source does)
//! should hold an [`EnvScope`] so no other test mutates variables while
//! the snapshot is taken.
//!
//! # Examples
//!
//! ```
//! use accrete_test_helpers::env;
//!
//! let _scope = env::EnvScope::with(&[("ACCRETE_DOC_KEY", Some("value"))]);
//! assert_eq!(std::env::var("ACCRETE_DOC_KEY").as_deref(), Ok("value"));
//! ```

use std::env;
use std::ffi::OsString;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

/// Sets `key` to `value` and returns a guard restoring its prior value.
pub fn set_var(key: impl Into<String>, value: impl Into<OsString>) -> EnvVarGuard {
    mutate(key.into(), Some(value.into()))
}

/// Removes `key` and returns a guard restoring its prior value.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    mutate(key.into(), None)
}

fn mutate(key: String, value: Option<OsString>) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    apply(&key, value);
    EnvVarGuard { key, original }
}

fn apply(key: &str, value: Option<OsString>) {
    // SAFETY: every caller holds ENV_MUTEX, serialising environment writes.
    match value {
        Some(v) => unsafe { env::set_var(key, v) },
        None => unsafe { env::remove_var(key) },
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        apply(&self.key, self.original.take());
    }
}

/// Holds the environment lock while a set of variables is overridden.
///
/// Variables are restored, in reverse order, before the lock is released.
#[must_use = "dropping releases the environment lock and restores variables"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl EnvScope {
    /// Apply `vars`, setting each `Some` value and removing each `None`.
    pub fn with(vars: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX.lock();
        let guards = vars
            .iter()
            .map(|(key, value)| mutate((*key).to_owned(), value.map(OsString::from)))
            .collect();
        Self {
            guards,
            _lock: lock,
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

#[cfg(test)]
mod tests;
