use std::sync::Arc;

use tokio::sync::Mutex;

use jm_core::{RegistrationDraft, ResetDraft, Role, Session, SignupDraft};

/// Ephemeral drafts owned by the flow controller. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowDrafts {
    pub signup: Option<SignupDraft>,
    pub reset: Option<ResetDraft>,
    pub worker: RegistrationDraft,
    pub employer: RegistrationDraft,
}

impl FlowDrafts {
    pub fn registration(&self, role: Role) -> &RegistrationDraft {
        match role {
            Role::Worker => &self.worker,
            Role::Employer => &self.employer,
        }
    }

    pub fn registration_mut(&mut self, role: Role) -> &mut RegistrationDraft {
        match role {
            Role::Worker => &mut self.worker,
            Role::Employer => &mut self.employer,
        }
    }
}

/// Everything the controller mutates in one dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FlowState {
    pub session: Session,
    pub drafts: FlowDrafts,
}

/// Shared flow context containing state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: held for a whole dispatch (transition + actions + state update).
/// - `state`: held only for reads and the final write.
#[derive(Clone)]
pub(crate) struct FlowContext {
    state: Arc<Mutex<FlowState>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl FlowContext {
    pub fn new(initial_state: FlowState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial_state)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the context wrapped in Arc for shared ownership.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read; does NOT acquire `dispatch_lock`.
    pub async fn get_state(&self) -> FlowState {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Should only be called while holding `dispatch_lock`.
    pub async fn set_state(&self, state: FlowState) {
        let mut guard = self.state.lock().await;
        *guard = state;
    }
}
