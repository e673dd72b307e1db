//! Screen-flow use cases.
//!
//! This module exposes the flow orchestrator.

mod context;
pub mod orchestrator;

pub use context::FlowDrafts;
pub use orchestrator::{FlowOrchestrator, FlowPorts};
