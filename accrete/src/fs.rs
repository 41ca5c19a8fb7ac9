//! File system collaborator used by the JSON source.
//!
//! The accumulator only ever reads through this trait. Writing and deleting
//! are part of the contract so callers and tests can stage settings files
//! through the same abstraction they inject.

use std::io;

use async_trait::async_trait;
use camino::Utf8Path;

/// Asynchronous access to settings files.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read the full contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`]; a missing file must be reported with
    /// [`io::ErrorKind::NotFound`].
    async fn read_file(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of `path` with `data`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when the file cannot be written.
    async fn write_file(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()>;

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when the file cannot be removed.
    async fn delete_file(&self, path: &Utf8Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `tokio::fs`.
///
/// Every operation needs an ambient Tokio runtime. Polled from any other
/// executor it fails with [`io::ErrorKind::Other`] instead of touching the
/// disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        require_runtime()?;
        tokio::fs::read(path).await
    }

    async fn write_file(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()> {
        require_runtime()?;
        tokio::fs::write(path, data).await
    }

    async fn delete_file(&self, path: &Utf8Path) -> io::Result<()> {
        require_runtime()?;
        tokio::fs::remove_file(path).await
    }
}

// `tokio::fs` panics without a runtime to offload blocking work onto.
fn require_runtime() -> io::Result<()> {
    tokio::runtime::Handle::try_current()
        .map(drop)
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use camino::Utf8PathBuf;

    #[tokio::test]
    async fn round_trips_through_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = Utf8PathBuf::from_path_buf(dir.path().join("settings.json"))
            .map_err(|p| anyhow::anyhow!("non-UTF-8 temp path: {}", p.display()))?;
        let fs = TokioFileSystem;

        fs.write_file(&path, br#"{"foo":1}"#).await?;
        ensure!(fs.read_file(&path).await? == br#"{"foo":1}"#.to_vec());

        fs.delete_file(&path).await?;
        let Err(err) = fs.read_file(&path).await else {
            anyhow::bail!("expected read after delete to fail");
        };
        ensure!(err.kind() == io::ErrorKind::NotFound, "unexpected error: {err}");
        Ok(())
    }

    #[test]
    fn reports_missing_runtime_as_io_error() {
        let err = futures::executor::block_on(TokioFileSystem.read_file(Utf8Path::new("a.json")))
            .expect_err("no runtime");
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
