//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into the `AppConfig` DTO. Pure data loading: no
//! validation and no defaults, whatever is in the file is accepted.
//! Defaults are applied during wiring.

use anyhow::Context;
use std::path::{Path, PathBuf};

use jm_core::config::AppConfig;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "JOBMARKET_CONFIG";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Resolves the config path from `JOBMARKET_CONFIG` (after loading `.env`)
/// and loads it. No variable, or no file at the path, yields
/// `AppConfig::empty()`.
pub fn load_config_from_env() -> anyhow::Result<AppConfig> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("Failed to load .env file");
        }
    }

    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_config_if_present(Path::new(&path)),
        _ => Ok(AppConfig::empty()),
    }
}

fn load_config_if_present(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file not found; using empty config");
        return Ok(AppConfig::empty());
    }
    load_config(path.to_path_buf())
}
