//! # jm-shell
//!
//! Host shell for the job marketplace client. Loads configuration,
//! initializes tracing, wires adapters into the flow orchestrator and drives
//! it from a JSON-lines stream.

pub mod adapters;
pub mod bootstrap;

pub use bootstrap::{load_config_from_env, run_app};
