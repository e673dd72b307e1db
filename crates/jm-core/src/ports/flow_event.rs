use crate::draft::RegistrationDraft;
use crate::role::Role;
use crate::session::Session;

/// Host-side sink for flow notifications (re-render, analytics, ...).
#[async_trait::async_trait]
pub trait FlowEventPort: Send + Sync {
    async fn emit_session_changed(&self, session: Session);

    async fn emit_registration_submitted(&self, role: Role, draft: RegistrationDraft);
}
