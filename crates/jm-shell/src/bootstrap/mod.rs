pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_from_env};
pub use run::{run_app, run_event_loop};
pub use wiring::{resolve_app_paths, resolve_default_app_paths, wire_with_paths, ShellDeps};
