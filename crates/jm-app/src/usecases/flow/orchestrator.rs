//! Flow orchestrator.
//!
//! This module coordinates the screen-flow state machine and side effects.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use jm_core::ports::{FlowEventPort, IdentityPort, KeyValueStorePort, ProfileCompletionPort};
use jm_core::{
    AuthChange, ContactMethod, FlowAction, FlowError, FlowEvent, FlowStateMachine, FlowView,
    IdentityId, RegistrationDraft, RegistrationFields, ResetDraft, Role, Session,
    SignupDraft,
};

use crate::usecases::flow::context::{FlowContext, FlowState};
use crate::usecases::flow::FlowDrafts;
use crate::usecases::session::{
    MarkProfileComplete, PendingIdentityMarker, RestoreSession, SessionSnapshotStore,
};

/// Boundary collaborators of the flow controller.
#[derive(Clone)]
pub struct FlowPorts {
    pub identity: Arc<dyn IdentityPort>,
    pub store: Arc<dyn KeyValueStorePort>,
    pub profile: Arc<dyn ProfileCompletionPort>,
    pub flow_events: Arc<dyn FlowEventPort>,
}

/// Orchestrator that drives the screen flow and its side effects.
///
/// Single source of truth for what is on screen. Side-effect failures are
/// logged and never block navigation.
pub struct FlowOrchestrator {
    context: Arc<FlowContext>,
    restored: OnceCell<()>,

    restore_session: Arc<RestoreSession>,
    snapshots: Arc<SessionSnapshotStore>,
    pending_identity: Arc<PendingIdentityMarker>,
    mark_profile_complete: Arc<MarkProfileComplete>,
    identity: Arc<dyn IdentityPort>,
    flow_events: Arc<dyn FlowEventPort>,
}

impl FlowOrchestrator {
    pub fn new(
        restore_session: Arc<RestoreSession>,
        snapshots: Arc<SessionSnapshotStore>,
        pending_identity: Arc<PendingIdentityMarker>,
        mark_profile_complete: Arc<MarkProfileComplete>,
        identity: Arc<dyn IdentityPort>,
        flow_events: Arc<dyn FlowEventPort>,
    ) -> Self {
        Self {
            context: FlowContext::new(FlowState::default()).arc(),
            restored: OnceCell::new(),
            restore_session,
            snapshots,
            pending_identity,
            mark_profile_complete,
            identity,
            flow_events,
        }
    }

    /// Builds the orchestrator and its use cases from raw ports.
    pub fn from_ports(ports: FlowPorts) -> Self {
        let snapshots = Arc::new(SessionSnapshotStore::new(ports.store.clone()));
        let pending_identity = Arc::new(PendingIdentityMarker::new(ports.store));
        let restore_session = Arc::new(RestoreSession::new(
            ports.identity.clone(),
            snapshots.clone(),
            pending_identity.clone(),
        ));
        let mark_profile_complete = Arc::new(MarkProfileComplete::new(
            pending_identity.clone(),
            ports.profile,
        ));
        Self::new(
            restore_session,
            snapshots,
            pending_identity,
            mark_profile_complete,
            ports.identity,
            ports.flow_events,
        )
    }

    // ===== Leaf screen entry points =====

    pub async fn request_login(&self) -> Session {
        self.dispatch(FlowEvent::RequestLogin).await
    }

    pub async fn request_signup(&self) -> Session {
        self.dispatch(FlowEvent::RequestSignup).await
    }

    pub async fn signup_succeeded(
        &self,
        role: Role,
        method: ContactMethod,
        contact: String,
        password: Option<String>,
        identity_id: Option<IdentityId>,
    ) -> Session {
        self.dispatch(FlowEvent::SignupSucceeded {
            role,
            method,
            contact,
            password,
            identity_id,
        })
        .await
    }

    pub async fn verified(&self) -> Session {
        self.dispatch(FlowEvent::Verified).await
    }

    pub async fn request_forgot_password(&self) -> Session {
        self.dispatch(FlowEvent::RequestForgotPassword).await
    }

    pub async fn code_sent(&self, method: ContactMethod, contact: String) -> Session {
        self.dispatch(FlowEvent::CodeSent { method, contact }).await
    }

    pub async fn reset_succeeded(&self) -> Session {
        self.dispatch(FlowEvent::ResetSucceeded).await
    }

    pub async fn login_succeeded(
        &self,
        role: Role,
        profile_complete: bool,
        display_name: String,
    ) -> Session {
        self.dispatch(FlowEvent::LoginSucceeded {
            role,
            profile_complete,
            display_name,
        })
        .await
    }

    pub async fn step_complete(&self, fields: RegistrationFields) -> Session {
        self.dispatch(FlowEvent::StepComplete { fields }).await
    }

    pub async fn submit_registration(&self, fields: RegistrationFields) -> Session {
        self.dispatch(FlowEvent::Submitted { fields }).await
    }

    pub async fn skip_registration(&self) -> Session {
        self.dispatch(FlowEvent::Skipped).await
    }

    pub async fn back(&self) -> Session {
        self.dispatch(FlowEvent::Back).await
    }

    pub async fn logout(&self) -> Session {
        self.dispatch(FlowEvent::LogoutRequested).await
    }

    // ===== Queries =====

    /// Current session. Reports `is_loading` until the restore has run.
    pub async fn session(&self) -> Session {
        self.context.get_state().await.session
    }

    /// What the host should render right now.
    pub async fn view(&self) -> FlowView {
        let session = self.session().await;
        FlowView::resolve(session.current_screen, session.role)
    }

    pub async fn signup_draft(&self) -> Option<SignupDraft> {
        self.context.get_state().await.drafts.signup
    }

    pub async fn reset_draft(&self) -> Option<ResetDraft> {
        self.context.get_state().await.drafts.reset
    }

    pub async fn registration_draft(&self, role: Role) -> RegistrationDraft {
        self.context
            .get_state()
            .await
            .drafts
            .registration(role)
            .clone()
    }

    // ===== Restore =====

    /// Runs the startup restore once. Later calls return the current session.
    pub async fn restore(&self) -> Session {
        self.ensure_restored().await;
        self.session().await
    }

    async fn ensure_restored(&self) {
        self.restored
            .get_or_init(|| async {
                let _dispatch_guard = self.context.acquire_dispatch_lock().await;
                let session = self.restore_session.execute().await;
                let mut state = self.context.get_state().await;
                state.session = session;
                self.set_state_and_emit(state).await;
            })
            .await;
    }

    // ===== Dispatch =====

    /// Applies one event. Waits for the startup restore first.
    pub async fn dispatch(&self, event: FlowEvent) -> Session {
        self.ensure_restored().await;
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.apply_locked(event).await
    }

    /// Logs out after the identity provider reported a sign-out. Returns
    /// `None` when no role is set, which includes the echo of a logout the
    /// flow itself requested.
    async fn logout_after_external_sign_out(&self) -> Option<Session> {
        self.ensure_restored().await;
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        if self.context.get_state().await.session.role.is_none() {
            debug!("auth change: signed out while already signed out");
            return None;
        }
        info!("identity signed out externally; logging out");
        Some(self.apply_locked(FlowEvent::LogoutRequested).await)
    }

    /// Caller must hold the dispatch lock.
    async fn apply_locked(&self, event: FlowEvent) -> Session {
        let span = info_span!("usecase.flow_orchestrator.dispatch", event = event.name());
        async {
            let mut state = self.context.get_state().await;
            let from = state.session.current_screen;
            let event_name = event.name();

            let (next, actions) = FlowStateMachine::transition(from, event, state.session.role);
            info!(from = %from, to = %next, event = %event_name, "flow transition");

            self.execute_actions(&mut state, actions).await;
            state.session.current_screen = next;

            if next != from {
                self.persist_snapshot(&state.session).await;
            }

            self.set_state_and_emit(state.clone()).await;
            state.session
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(&self, state: &mut FlowState, actions: Vec<FlowAction>) {
        for action in actions {
            debug!(action = action_name(&action), "flow executing action");
            match action {
                FlowAction::SetRole(role) => {
                    state.session.role = Some(role);
                }
                FlowAction::StoreSignupDraft(draft) => {
                    state.drafts.signup = Some(draft);
                }
                FlowAction::RememberPendingIdentity(identity_id) => {
                    tolerate(
                        self.pending_identity
                            .remember(&identity_id)
                            .await
                            .map_err(FlowError::PersistenceFailed),
                    );
                }
                FlowAction::StoreResetDraft(draft) => {
                    state.drafts.reset = Some(draft);
                }
                FlowAction::EstablishSession {
                    role,
                    display_name,
                    profile_complete,
                } => {
                    state.session.role = Some(role);
                    state.session.display_name = display_name;
                    state.session.profile_complete = profile_complete;
                }
                FlowAction::MergeRegistration { role, fields } => {
                    state.drafts.registration_mut(role).merge(fields);
                }
                FlowAction::SubmitRegistration { role } => {
                    let draft = state.drafts.registration_mut(role).take();
                    state.session.profile_complete = true;
                    info!(role = %role, fields = draft.len(), "registration submitted");
                    self.flow_events
                        .emit_registration_submitted(role, draft)
                        .await;
                }
                FlowAction::MarkProfileComplete => {
                    tolerate(self.mark_profile_complete.execute().await.map(|_| ()));
                }
                FlowAction::ClearPendingIdentity => {
                    tolerate(
                        self.pending_identity
                            .clear()
                            .await
                            .map_err(FlowError::PersistenceFailed),
                    );
                }
                FlowAction::DiscardRegistration { role } => {
                    state.drafts.registration_mut(role).clear();
                }
                FlowAction::SignOut => {
                    state.session.sign_out();
                    state.drafts = FlowDrafts::default();
                    tolerate(
                        self.snapshots
                            .clear()
                            .await
                            .map_err(FlowError::PersistenceFailed),
                    );
                    tolerate(
                        self.pending_identity
                            .clear()
                            .await
                            .map_err(FlowError::PersistenceFailed),
                    );
                    tolerate(
                        self.identity
                            .sign_out()
                            .await
                            .map_err(FlowError::SignOutFailed),
                    );
                }
            }
        }
    }

    async fn persist_snapshot(&self, session: &Session) {
        match session.snapshot() {
            Some(snapshot) => tolerate(
                self.snapshots
                    .save(&snapshot)
                    .await
                    .map_err(FlowError::PersistenceFailed),
            ),
            None => debug!(screen = %session.current_screen, "screen is not persisted"),
        }
    }

    async fn set_state_and_emit(&self, state: FlowState) {
        let session = state.session.clone();
        self.context.set_state(state).await;
        self.flow_events.emit_session_changed(session).await;
    }

    // ===== Auth changes =====

    /// Follows identity-provider auth changes for the lifetime of the
    /// subscription. An external sign-out while a role is set logs the user
    /// out of the flow.
    pub async fn spawn_auth_listener(self: &Arc<Self>) -> anyhow::Result<JoinHandle<()>> {
        let mut changes = self.identity.subscribe_auth_changes().await?;
        let orchestrator = Arc::clone(self);

        Ok(tokio::spawn(
            async move {
                while let Some(change) = changes.recv().await {
                    match change {
                        AuthChange::SignedOut => {
                            orchestrator.logout_after_external_sign_out().await;
                        }
                        AuthChange::SignedIn(identity) => {
                            debug!(identity_id = %identity.id, "auth change: signed in");
                        }
                    }
                }
                debug!("auth change stream closed");
            }
            .instrument(info_span!("usecase.flow_orchestrator.auth_listener")),
        ))
    }
}

/// Best-effort side effects: log and carry on.
fn tolerate(result: Result<(), FlowError>) {
    if let Err(err) = result {
        warn!(error = %err.report(), "flow side effect failed; navigation proceeds");
    }
}

fn action_name(action: &FlowAction) -> &'static str {
    match action {
        FlowAction::SetRole(_) => "SetRole",
        FlowAction::StoreSignupDraft(_) => "StoreSignupDraft",
        FlowAction::RememberPendingIdentity(_) => "RememberPendingIdentity",
        FlowAction::StoreResetDraft(_) => "StoreResetDraft",
        FlowAction::EstablishSession { .. } => "EstablishSession",
        FlowAction::MergeRegistration { .. } => "MergeRegistration",
        FlowAction::SubmitRegistration { .. } => "SubmitRegistration",
        FlowAction::MarkProfileComplete => "MarkProfileComplete",
        FlowAction::ClearPendingIdentity => "ClearPendingIdentity",
        FlowAction::DiscardRegistration { .. } => "DiscardRegistration",
        FlowAction::SignOut => "SignOut",
    }
}
