//! Session state owned by the flow controller.

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::screen::Screen;

/// Display name used until the backend reports one.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Keys written to the durable key-value store.
pub mod keys {
    pub const ROLE: &str = "role";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const CURRENT_SCREEN: &str = "currentScreen";
    pub const PENDING_IDENTITY_ID: &str = "pendingIdentityId";

    /// The snapshot triple. Always written and cleared as a unit.
    pub const SNAPSHOT: [&str; 3] = [ROLE, DISPLAY_NAME, CURRENT_SCREEN];
}

/// Process-wide session.
///
/// 会话状态：由控制器独占修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub current_screen: Screen,
    pub role: Option<Role>,
    pub display_name: String,
    /// True only until the startup restore completes.
    pub is_loading: bool,
    pub profile_complete: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_screen: Screen::Home,
            role: None,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            is_loading: true,
            profile_complete: false,
        }
    }

    /// The snapshot to persist for this session, if the current screen and
    /// role allow one.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        if self.current_screen.is_entry() {
            return None;
        }
        let role = self.role?;
        Some(SessionSnapshot {
            role,
            display_name: self.display_name.clone(),
            current_screen: self.current_screen,
        })
    }

    /// Forget everything tied to the signed-in user. Loading state is kept.
    pub fn sign_out(&mut self) {
        self.current_screen = Screen::Home;
        self.role = None;
        self.display_name = DEFAULT_DISPLAY_NAME.to_string();
        self.profile_complete = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Durable `{role, displayName, currentScreen}` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub role: Role,
    pub display_name: String,
    pub current_screen: Screen,
}

impl SessionSnapshot {
    /// Screen to resume on.
    ///
    /// Entry screens resume to the dashboard, as does a registration screen
    /// belonging to the other role's wizard.
    pub fn resume_screen(&self) -> Screen {
        if self.current_screen.is_entry() {
            return Screen::Dashboard;
        }
        match self.current_screen.registration_step() {
            Some((role, _)) if role != self.role => Screen::Dashboard,
            _ => self.current_screen,
        }
    }
}
