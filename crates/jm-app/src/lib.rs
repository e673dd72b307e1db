//! # jm-app
//!
//! Use cases for the job marketplace client: session restore, snapshot
//! persistence, profile completion and the screen-flow orchestrator.

pub mod app_paths;
pub mod usecases;

pub use usecases::{FlowOrchestrator, FlowPorts};
