//! Key-value store adapters

mod file_store;
mod memory;

pub use file_store::{FileKeyValueStore, FileStoreError, DEFAULT_SESSION_FILE};
pub use memory::InMemoryKeyValueStore;
