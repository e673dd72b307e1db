use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use jm_core::ports::KeyValueStorePort;

/// Process-local store for tests. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, pairs: &[(&str, String)]) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
