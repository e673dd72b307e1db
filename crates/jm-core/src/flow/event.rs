use serde::{Deserialize, Serialize};

use crate::draft::{ContactMethod, RegistrationFields};
use crate::ids::IdentityId;
use crate::role::Role;

/// Events raised by the screen currently on display.
///
/// 由当前屏幕触发的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FlowEvent {
    // Home
    RequestLogin,
    RequestSignup,

    // Sign-up and verification
    SignupSucceeded {
        role: Role,
        method: ContactMethod,
        contact: String,
        #[serde(default)]
        password: Option<String>,
        /// Identity created by the backend, kept until the wizard submits.
        #[serde(default)]
        identity_id: Option<IdentityId>,
    },
    Verified,

    // Login and password reset
    RequestForgotPassword,
    CodeSent {
        method: ContactMethod,
        contact: String,
    },
    ResetSucceeded,
    LoginSucceeded {
        role: Role,
        #[serde(default)]
        profile_complete: bool,
        display_name: String,
    },

    // Registration wizards
    StepComplete {
        #[serde(default)]
        fields: RegistrationFields,
    },
    Submitted {
        #[serde(default)]
        fields: RegistrationFields,
    },
    Skipped,

    // Control
    Back,
    LogoutRequested,
}

impl FlowEvent {
    /// Variant name, for logs. Payloads may hold credentials.
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::RequestLogin => "RequestLogin",
            FlowEvent::RequestSignup => "RequestSignup",
            FlowEvent::SignupSucceeded { .. } => "SignupSucceeded",
            FlowEvent::Verified => "Verified",
            FlowEvent::RequestForgotPassword => "RequestForgotPassword",
            FlowEvent::CodeSent { .. } => "CodeSent",
            FlowEvent::ResetSucceeded => "ResetSucceeded",
            FlowEvent::LoginSucceeded { .. } => "LoginSucceeded",
            FlowEvent::StepComplete { .. } => "StepComplete",
            FlowEvent::Submitted { .. } => "Submitted",
            FlowEvent::Skipped => "Skipped",
            FlowEvent::Back => "Back",
            FlowEvent::LogoutRequested => "LogoutRequested",
        }
    }
}
