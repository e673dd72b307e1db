//! File-based key-value store
//!
//! This module provides a file-based implementation of the KeyValueStorePort,
//! persisting every key as one JSON object in the application data directory.
//! Writes go to a temporary sibling file that is renamed over the original,
//! so a batch of keys lands on disk together or not at all. A file that no
//! longer parses is reported by reads and overwritten by the next write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use jm_core::ports::KeyValueStorePort;

pub const DEFAULT_SESSION_FILE: &str = "session.json";

type Entries = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("failed to parse key-value file {path:?}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write key-value file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct FileKeyValueStore {
    file_path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create store with custom file path
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Create store with base dir and filename
    pub fn with_base_dir(base_dir: PathBuf, filename: impl Into<String>) -> Self {
        Self::new(base_dir.join(filename.into()))
    }

    /// Create store with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_SESSION_FILE))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn read_entries(&self) -> anyhow::Result<Entries> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Entries::new())
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|source| {
            FileStoreError::Corrupt {
                path: self.file_path.clone(),
                source,
            }
            .into()
        })
    }

    async fn write_entries(&self, entries: &Entries) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self
            .file_path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));

        let write = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(json.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, &self.file_path).await
        };

        if let Err(source) = write.await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(FileStoreError::Write {
                path: self.file_path.clone(),
                source,
            }
            .into());
        }
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let (mut entries, replace_corrupt) = match self.read_entries().await {
            Ok(entries) => (entries, false),
            Err(err) => match err.downcast_ref::<FileStoreError>() {
                Some(FileStoreError::Corrupt { path, source }) => {
                    warn!(
                        path = %path.display(),
                        error = %source,
                        "key-value file is corrupt; replacing it with an empty store"
                    );
                    (Entries::new(), true)
                }
                _ => return Err(err),
            },
        };
        if apply(&mut entries) || replace_corrupt {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let _guard = self.write_lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.update(|entries| entries.remove(key).is_some()).await
    }

    async fn set_many(&self, pairs: &[(&str, String)]) -> anyhow::Result<()> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert(key.to_string(), value.clone());
            }
            true
        })
        .await?;
        debug!(count = pairs.len(), path = %self.file_path.display(), "stored key batch");
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> anyhow::Result<()> {
        self.update(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(*key);
            }
            entries.len() != before
        })
        .await
    }
}
