//! # jm-infra
//!
//! Adapters behind the `jm-core` ports: key-value stores, the stub backend
//! and app directory resolution.

pub mod fs;
pub mod kv;
pub mod stub;

pub use fs::PlatformAppDirs;
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore};
pub use stub::StubBackend;
