//! Session persistence use cases.

mod mark_complete;
mod pending_identity;
mod restore;
mod snapshot_store;

pub use mark_complete::MarkProfileComplete;
pub use pending_identity::PendingIdentityMarker;
pub use restore::RestoreSession;
pub use snapshot_store::SessionSnapshotStore;
