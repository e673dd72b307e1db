//! Port interfaces for the application layer
//!
//! Ports define the contract between the flow controller (use cases) and the
//! infrastructure implementations: the identity provider, the durable
//! key-value store, the profile-completion service and the host UI.
//!
//! Every port returns `anyhow::Result`; the controller decides which failures
//! are tolerated.

pub mod app_dirs;
pub mod errors;
mod flow_event;
mod identity;
mod kv_store;
mod profile;

pub use app_dirs::AppDirsPort;
pub use errors::AppDirsError;
pub use flow_event::FlowEventPort;
pub use identity::IdentityPort;
pub use kv_store::KeyValueStorePort;
pub use profile::ProfileCompletionPort;
