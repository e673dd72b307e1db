//! Screen identifiers.
//!
//! The closed set of screens the flow controller can put on display.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Number of steps in the worker registration wizard.
pub const WORKER_STEPS: u8 = 5;

/// Number of steps in the employer registration wizard.
pub const EMPLOYER_STEPS: u8 = 3;

/// Screen identifier.
///
/// 屏幕标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Home,
    Login,
    SignUp,
    VerifySignup,
    VerifyEmail,
    ForgotPassword,
    ResetPassword,
    WorkerReg1,
    WorkerReg2,
    WorkerReg3,
    WorkerReg4,
    WorkerReg5,
    EmployerReg1,
    EmployerReg2,
    EmployerReg3,
    /// Role-dependent selector, see [`crate::flow::FlowView`].
    Dashboard,
}

impl Screen {
    pub const ALL: [Screen; 16] = [
        Screen::Home,
        Screen::Login,
        Screen::SignUp,
        Screen::VerifySignup,
        Screen::VerifyEmail,
        Screen::ForgotPassword,
        Screen::ResetPassword,
        Screen::WorkerReg1,
        Screen::WorkerReg2,
        Screen::WorkerReg3,
        Screen::WorkerReg4,
        Screen::WorkerReg5,
        Screen::EmployerReg1,
        Screen::EmployerReg2,
        Screen::EmployerReg3,
        Screen::Dashboard,
    ];

    /// Stable name used in the persisted snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Login => "Login",
            Screen::SignUp => "SignUp",
            Screen::VerifySignup => "VerifySignup",
            Screen::VerifyEmail => "VerifyEmail",
            Screen::ForgotPassword => "ForgotPassword",
            Screen::ResetPassword => "ResetPassword",
            Screen::WorkerReg1 => "WorkerReg1",
            Screen::WorkerReg2 => "WorkerReg2",
            Screen::WorkerReg3 => "WorkerReg3",
            Screen::WorkerReg4 => "WorkerReg4",
            Screen::WorkerReg5 => "WorkerReg5",
            Screen::EmployerReg1 => "EmployerReg1",
            Screen::EmployerReg2 => "EmployerReg2",
            Screen::EmployerReg3 => "EmployerReg3",
            Screen::Dashboard => "Dashboard",
        }
    }

    /// Worker wizard screen for a 1-based step, if it exists.
    pub fn worker_step(step: u8) -> Option<Screen> {
        match step {
            1 => Some(Screen::WorkerReg1),
            2 => Some(Screen::WorkerReg2),
            3 => Some(Screen::WorkerReg3),
            4 => Some(Screen::WorkerReg4),
            5 => Some(Screen::WorkerReg5),
            _ => None,
        }
    }

    /// Employer wizard screen for a 1-based step, if it exists.
    pub fn employer_step(step: u8) -> Option<Screen> {
        match step {
            1 => Some(Screen::EmployerReg1),
            2 => Some(Screen::EmployerReg2),
            3 => Some(Screen::EmployerReg3),
            _ => None,
        }
    }

    /// First step of the wizard belonging to `role`.
    pub fn registration_start(role: Role) -> Screen {
        match role {
            Role::Worker => Screen::WorkerReg1,
            Role::Employer => Screen::EmployerReg1,
        }
    }

    /// Role and 1-based step when this is a registration wizard screen.
    pub fn registration_step(&self) -> Option<(Role, u8)> {
        match self {
            Screen::WorkerReg1 => Some((Role::Worker, 1)),
            Screen::WorkerReg2 => Some((Role::Worker, 2)),
            Screen::WorkerReg3 => Some((Role::Worker, 3)),
            Screen::WorkerReg4 => Some((Role::Worker, 4)),
            Screen::WorkerReg5 => Some((Role::Worker, 5)),
            Screen::EmployerReg1 => Some((Role::Employer, 1)),
            Screen::EmployerReg2 => Some((Role::Employer, 2)),
            Screen::EmployerReg3 => Some((Role::Employer, 3)),
            _ => None,
        }
    }

    /// Screen following this one inside its wizard; `None` on the last step
    /// or outside a wizard.
    pub fn next_registration_step(&self) -> Option<Screen> {
        let (role, step) = self.registration_step()?;
        match role {
            Role::Worker => Screen::worker_step(step + 1),
            Role::Employer => Screen::employer_step(step + 1),
        }
    }

    pub fn is_final_registration_step(&self) -> bool {
        matches!(self, Screen::WorkerReg5 | Screen::EmployerReg3)
    }

    /// Immediate predecessor for back navigation. `None` means back is ignored.
    pub fn predecessor(&self) -> Option<Screen> {
        match self {
            Screen::Home | Screen::Dashboard => None,
            Screen::Login | Screen::SignUp => Some(Screen::Home),
            Screen::VerifySignup | Screen::VerifyEmail => Some(Screen::SignUp),
            Screen::ForgotPassword => Some(Screen::Login),
            Screen::ResetPassword => Some(Screen::ForgotPassword),
            Screen::WorkerReg1 | Screen::EmployerReg1 => Some(Screen::Home),
            other => {
                let (role, step) = other.registration_step()?;
                match role {
                    Role::Worker => Screen::worker_step(step - 1),
                    Role::Employer => Screen::employer_step(step - 1),
                }
            }
        }
    }

    /// Entry screens are never written to, nor resumed from, the snapshot.
    pub fn is_entry(&self) -> bool {
        matches!(self, Screen::Home | Screen::Login | Screen::SignUp)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Home
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen: {0}")]
pub struct ParseScreenError(pub String);

impl FromStr for Screen {
    type Err = ParseScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Screen::ALL
            .iter()
            .copied()
            .find(|screen| screen.as_str() == name)
            .ok_or_else(|| ParseScreenError(s.to_string()))
    }
}
