//! Screen-flow domain module.
//!
//! This module defines the onboarding and registration flow state machine types.

pub mod action;
pub mod event;
pub mod state_machine;
pub mod view;

pub use action::FlowAction;
pub use event::FlowEvent;
pub use state_machine::FlowStateMachine;
pub use view::FlowView;
