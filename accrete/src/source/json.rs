//! JSON settings file source.
//!
//! A missing file is treated as `{}` so optional settings files need no
//! special handling by callers. Any other read failure, malformed JSON, or
//! a top-level value that is not an object fails the step. Keys are merged
//! verbatim.

use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use serde_json::{Map, Value};

use crate::fs::FileSystem;
use crate::options::Entry;
use crate::{AccreteError, AccreteResult};

/// Read and parse the settings file at `path`.
///
/// # Errors
///
/// Returns [`AccreteError::File`] for I/O failures other than
/// [`io::ErrorKind::NotFound`], [`AccreteError::Json`] for malformed
/// content and [`AccreteError::NotAnObject`] when the document is not an
/// object.
pub(crate) async fn read(fs: &dyn FileSystem, path: &Utf8Path) -> AccreteResult<Vec<Entry>> {
    let data = match fs.read_file(path).await {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(%path, "settings file not found; treating as empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(Arc::new(AccreteError::File {
                path: path.to_owned(),
                source,
            }));
        }
    };
    let value: Value = serde_json::from_slice(&data).map_err(|source| {
        Arc::new(AccreteError::Json {
            path: path.to_owned(),
            source,
        })
    })?;
    let map = object(value, || format!("settings file '{path}'"))?;
    tracing::debug!(%path, keys = map.len(), "read settings file");
    Ok(map.into_iter().collect())
}

/// Unwrap a JSON object, reporting `origin` when `value` is anything else.
pub(crate) fn object<F>(value: Value, origin: F) -> AccreteResult<Map<String, Value>>
where
    F: FnOnce() -> String,
{
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Arc::new(AccreteError::not_an_object(origin(), &other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::TokioFileSystem;
    use anyhow::{Result, anyhow, bail, ensure};
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use serde_json::json;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Result<Utf8PathBuf> {
        Utf8PathBuf::from_path_buf(dir.path().join(name))
            .map_err(|p| anyhow!("non-UTF-8 temp path: {}", p.display()))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = temp_path(&dir, "absent.json")?;
        let entries = read(&TokioFileSystem, &path)
            .await
            .map_err(|e| anyhow!(e.to_string()))?;
        ensure!(entries.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn keys_are_kept_verbatim() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = temp_path(&dir, "settings.json")?;
        std::fs::write(&path, r#"{"foo":2,"fooBar":3,"SHOUT_CASE":true}"#)?;
        let entries = read(&TokioFileSystem, &path)
            .await
            .map_err(|e| anyhow!(e.to_string()))?;
        let map: Map<String, Value> = entries.into_iter().collect();
        ensure!(Value::Object(map) == json!({"foo": 2, "fooBar": 3, "SHOUT_CASE": true}));
        Ok(())
    }

    #[rstest]
    #[case::malformed("{\"foo\":", "malformed JSON")]
    #[case::array("[1, 2]", "must be a JSON object, found an array")]
    #[tokio::test]
    async fn invalid_content_fails(#[case] content: &str, #[case] message: &str) -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = temp_path(&dir, "settings.json")?;
        std::fs::write(&path, content)?;
        let Err(err) = read(&TokioFileSystem, &path).await else {
            bail!("expected {content:?} to fail");
        };
        ensure!(err.to_string().contains(message), "unexpected error: {err}");
        Ok(())
    }

    #[tokio::test]
    async fn directory_path_is_a_read_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = temp_path(&dir, "")?;
        let Err(err) = read(&TokioFileSystem, &path).await else {
            bail!("expected reading a directory to fail");
        };
        ensure!(matches!(&*err, AccreteError::File { .. }), "unexpected error: {err}");
        Ok(())
    }
}
