//! Business logic use cases
//!
//! [leaf screen] → FlowOrchestrator::dispatch
//!                      ↓
//!             FlowStateMachine::transition (pure)
//!                      ↓
//! SessionSnapshotStore / PendingIdentityMarker / MarkProfileComplete

pub mod flow;
pub mod session;

pub use flow::{FlowOrchestrator, FlowPorts};
pub use session::{MarkProfileComplete, PendingIdentityMarker, RestoreSession, SessionSnapshotStore};
