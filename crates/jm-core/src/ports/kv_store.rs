//! Durable key-value store port
//!
//! Holds the session snapshot keys and the pending identity marker.

use async_trait::async_trait;

#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Write several entries. Stores that can do it atomically should
    /// override this.
    async fn set_many(&self, entries: &[(&str, String)]) -> anyhow::Result<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Remove several keys, attempting every key even after a failure.
    async fn remove_many(&self, keys: &[&str]) -> anyhow::Result<()> {
        let mut first_error = None;
        for key in keys {
            if let Err(err) = self.remove(key).await {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
