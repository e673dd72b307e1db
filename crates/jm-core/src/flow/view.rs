use serde::Serialize;

use crate::role::Role;
use crate::screen::Screen;

/// What the host actually renders.
///
/// `Screen::Dashboard` is a selector over the role; it is resolved here on
/// every call and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowView {
    Screen(Screen),
    WorkerDashboard,
    EmployerDashboard,
}

impl FlowView {
    pub fn resolve(screen: Screen, role: Option<Role>) -> Self {
        match screen {
            Screen::Dashboard => match role {
                Some(Role::Worker) => FlowView::WorkerDashboard,
                _ => FlowView::EmployerDashboard,
            },
            other => FlowView::Screen(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlowView::Screen(screen) => screen.as_str(),
            FlowView::WorkerDashboard => "WorkerDashboard",
            FlowView::EmployerDashboard => "EmployerDashboard",
        }
    }
}
