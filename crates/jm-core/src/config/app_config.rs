use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Data directory override (path info only, no existence check)
    pub data_dir: PathBuf,

    /// Session store file name inside the data directory
    pub session_file: String,

    /// Simulated backend latency in milliseconds
    pub backend_latency_ms: u64,

    /// Identity the stub backend reports as signed in (may be empty)
    pub signed_in_identity: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            data_dir: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            session_file: toml_value
                .get("storage")
                .and_then(|s| s.get("session_file"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            backend_latency_ms: toml_value
                .get("backend")
                .and_then(|b| b.get("latency_ms"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
            signed_in_identity: toml_value
                .get("backend")
                .and_then(|b| b.get("signed_in_identity"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            session_file: String::new(),
            backend_latency_ms: 0,
            signed_in_identity: String::new(),
        }
    }
}
