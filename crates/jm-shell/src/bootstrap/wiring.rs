//! Dependency wiring: turns an `AppConfig` into a ready flow orchestrator.
//!
//! Config values are facts; defaults for empty values are decided here.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use jm_app::app_paths::AppPaths;
use jm_app::{FlowOrchestrator, FlowPorts};
use jm_core::app_dirs::AppDirs;
use jm_core::ports::AppDirsPort;
use jm_core::AppConfig;
use jm_infra::{FileKeyValueStore, PlatformAppDirs, StubBackend};

use crate::adapters::{JsonLinesFlowEvents, JsonLinesWriter};

/// Everything the driver loop needs.
pub struct ShellDeps {
    pub flow: Arc<FlowOrchestrator>,
    pub backend: Arc<StubBackend>,
    pub writer: Arc<JsonLinesWriter>,
}

/// Resolve file locations. An empty `data_dir` falls back to the platform
/// data directory.
pub fn resolve_app_paths(
    config: &AppConfig,
    app_dirs: &dyn AppDirsPort,
) -> anyhow::Result<AppPaths> {
    let dirs = if config.data_dir.as_os_str().is_empty() {
        app_dirs.get_app_dirs()?
    } else {
        AppDirs {
            app_data_root: config.data_dir.clone(),
        }
    };
    Ok(AppPaths::from_app_dirs(&dirs).with_session_file_name(&config.session_file))
}

/// [`resolve_app_paths`] against the platform data directory.
pub fn resolve_default_app_paths(config: &AppConfig) -> anyhow::Result<AppPaths> {
    resolve_app_paths(config, &PlatformAppDirs::from_env())
}

pub fn wire_with_paths(
    config: &AppConfig,
    paths: &AppPaths,
    writer: Arc<JsonLinesWriter>,
) -> anyhow::Result<ShellDeps> {
    let store = Arc::new(FileKeyValueStore::new(paths.session_file.clone()));
    let backend = Arc::new(StubBackend::signed_in(
        Duration::from_millis(config.backend_latency_ms),
        config.signed_in_identity.clone(),
    ));
    let flow_events = Arc::new(JsonLinesFlowEvents::new(writer.clone()));

    let flow = Arc::new(FlowOrchestrator::from_ports(FlowPorts {
        identity: backend.clone(),
        store,
        profile: backend.clone(),
        flow_events,
    }));

    info!(
        session_file = %paths.session_file.display(),
        latency_ms = config.backend_latency_ms,
        "dependencies wired"
    );

    Ok(ShellDeps {
        flow,
        backend,
        writer,
    })
}
