//! # jm-core
//!
//! Core domain models and screen-flow logic for the job marketplace client.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod config;
pub mod draft;
pub mod error;
pub mod flow;
pub mod ids;
pub mod ports;
pub mod role;
pub mod screen;
pub mod session;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use draft::{ContactMethod, RegistrationDraft, RegistrationFields, ResetDraft, SignupDraft};
pub use error::FlowError;
pub use flow::{FlowAction, FlowEvent, FlowStateMachine, FlowView};
pub use ids::{AuthChange, Identity, IdentityId};
pub use role::Role;
pub use screen::Screen;
pub use session::{Session, SessionSnapshot};
