//! In-memory file system for exercising the JSON source.
//!
//! Reads can be delayed per path so tests can make an early-declared source
//! finish after a later one, and individual paths can be made to fail with
//! a chosen [`io::ErrorKind`].

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use accrete::FileSystem;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;

#[derive(Default)]
struct State {
    files: HashMap<Utf8PathBuf, Vec<u8>>,
    delays: HashMap<Utf8PathBuf, Duration>,
    failures: HashMap<Utf8PathBuf, io::ErrorKind>,
    reads: Vec<Utf8PathBuf>,
}

/// [`FileSystem`] holding files in memory.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<Mutex<State>>,
}

impl MemoryFileSystem {
    /// Create an empty file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `contents` at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.state.lock().files.insert(path.into(), contents.into());
        self
    }

    /// Delay every read of `path` by `delay`.
    #[must_use]
    pub fn with_delay(self, path: impl Into<Utf8PathBuf>, delay: Duration) -> Self {
        self.state.lock().delays.insert(path.into(), delay);
        self
    }

    /// Fail every read of `path` with `kind`.
    #[must_use]
    pub fn with_failure(self, path: impl Into<Utf8PathBuf>, kind: io::ErrorKind) -> Self {
        self.state.lock().failures.insert(path.into(), kind);
        self
    }

    /// Paths read so far, in the order their reads started.
    #[must_use]
    pub fn reads(&self) -> Vec<Utf8PathBuf> {
        self.state.lock().reads.clone()
    }

    /// Current contents of `path`, if any.
    #[must_use]
    pub fn contents(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_file(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        let delay = {
            let mut state = self.state.lock();
            state.reads.push(path.to_owned());
            state.delays.get(path).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock();
        if let Some(kind) = state.failures.get(path) {
            return Err(io::Error::new(*kind, format!("injected failure for {path}")));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    async fn write_file(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()> {
        self.state.lock().files.insert(path.to_owned(), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &Utf8Path) -> io::Result<()> {
        self.state
            .lock()
            .files
            .remove(path)
            .map(drop)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }
}
