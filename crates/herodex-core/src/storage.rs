//! Snapshot storage backends.
//!
//! The store never writes partial updates: every save hands the backend the
//! complete collection, which replaces whatever was there before.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::hero::Hero;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Reads the full collection.
    async fn load(&self) -> Result<Vec<Hero>>;

    /// Replaces the stored collection with `heroes`.
    async fn save(&self, heroes: &[Hero]) -> Result<()>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// A pretty-printed JSON array on disk.
///
/// Saves go to a sibling `.tmp` file which is then renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a backend for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    async fn write_temp(&self, temp_path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl SnapshotStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Hero>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::storage(&self.path, format!("failed to read snapshot: {e}")))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::storage(&self.path, format!("malformed snapshot: {e}")))
    }

    async fn save(&self, heroes: &[Hero]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::storage(parent, format!("failed to create directory: {e}"))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(heroes)?;

        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, content.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::storage(
                &temp_path,
                format!("failed to write temp file: {e}"),
            ));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::storage(
                &self.path,
                format!("failed to replace snapshot: {e}"),
            ));
        }

        tracing::debug!(path = %self.path.display(), heroes = heroes.len(), "Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory snapshot (for development/testing).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    heroes: Mutex<Vec<Hero>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    /// Creates a backend holding `heroes`.
    #[must_use]
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Mutex::new(heroes),
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Returns a copy of the last saved collection.
    #[must_use]
    pub fn contents(&self) -> Vec<Hero> {
        self.heroes.lock().clone()
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    /// Makes subsequent saves fail, as a read-only disk would.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<Hero>> {
        Ok(self.contents())
    }

    async fn save(&self, heroes: &[Hero]) -> Result<()> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(Error::storage("memory", "saves are disabled"));
        }
        *self.heroes.lock() = heroes.to_vec();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
