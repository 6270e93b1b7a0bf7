//! File-backed local cache
//!
//! One file per slot under the cache directory, read and written
//! wholesale. Writes go through a temp file in the same directory and a
//! rename, so a crash mid-write never leaves a half-written slot behind.

use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::LocalCachePort;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Per-slot file cache with local-storage semantics
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at the given directory, creating it if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApplicationError::Cache(format!("Failed to create cache dir: {e}")))?;
        debug!(dir = %dir.display(), "Local cache opened");
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, ApplicationError> {
        if !is_valid_slot_name(slot) {
            return Err(ApplicationError::Cache(format!(
                "Invalid cache slot name: {slot:?}"
            )));
        }
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

/// Slot names map directly to file names, so only plain identifiers pass
fn is_valid_slot_name(slot: &str) -> bool {
    !slot.is_empty() && slot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

async fn write_atomic(path: &Path, value: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, value).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl LocalCachePort for FileCache {
    #[instrument(skip(self))]
    async fn read(&self, slot: &str) -> Result<Option<String>, ApplicationError> {
        let path = self.slot_path(slot)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApplicationError::Cache(format!(
                "Failed to read slot {slot}: {e}"
            ))),
        }
    }

    #[instrument(skip(self, value), fields(value_len = value.len()))]
    async fn write(&self, slot: &str, value: &str) -> Result<(), ApplicationError> {
        let path = self.slot_path(slot)?;
        write_atomic(&path, value)
            .await
            .map_err(|e| ApplicationError::Cache(format!("Failed to write slot {slot}: {e}")))
    }

    #[instrument(skip(self))]
    async fn remove(&self, slot: &str) -> Result<(), ApplicationError> {
        let path = self.slot_path(slot)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApplicationError::Cache(format!(
                "Failed to remove slot {slot}: {e}"
            ))),
        }
    }
}
