//! End-to-end flow tests against the in-memory store and stub backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use jm_app::{FlowOrchestrator, FlowPorts};
use jm_core::ports::{FlowEventPort, IdentityPort, KeyValueStorePort};
use jm_core::session::keys;
use jm_core::{
    ContactMethod, FlowEvent, FlowView, IdentityId, RegistrationDraft, RegistrationFields, Role, Screen,
    Session,
};
use jm_infra::{InMemoryKeyValueStore, StubBackend};
use serde_json::json;

#[derive(Default)]
struct RecordingEvents {
    submissions: Mutex<Vec<(Role, RegistrationDraft)>>,
}

#[async_trait::async_trait]
impl FlowEventPort for RecordingEvents {
    async fn emit_session_changed(&self, _session: Session) {}

    async fn emit_registration_submitted(&self, role: Role, draft: RegistrationDraft) {
        self.submissions.lock().unwrap().push((role, draft));
    }
}

struct App {
    flow: Arc<FlowOrchestrator>,
    store: Arc<InMemoryKeyValueStore>,
    backend: Arc<StubBackend>,
    events: Arc<RecordingEvents>,
}

fn app_with(store: Arc<InMemoryKeyValueStore>, backend: Arc<StubBackend>) -> App {
    let events = Arc::new(RecordingEvents::default());
    let flow = Arc::new(FlowOrchestrator::from_ports(FlowPorts {
        identity: backend.clone(),
        store: store.clone(),
        profile: backend.clone(),
        flow_events: events.clone(),
    }));
    App {
        flow,
        store,
        backend,
        events,
    }
}

fn signed_out_app() -> App {
    app_with(
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(StubBackend::new(Duration::ZERO)),
    )
}

fn fields(value: serde_json::Value) -> RegistrationFields {
    value.as_object().cloned().unwrap()
}

async fn snapshot_keys_present(store: &InMemoryKeyValueStore) -> usize {
    let entries = store.snapshot().await;
    keys::SNAPSHOT
        .iter()
        .filter(|key| entries.contains_key(**key))
        .count()
}

#[tokio::test]
async fn worker_signup_and_full_registration() {
    let app = signed_out_app();

    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Worker,
            method: ContactMethod::Phone,
            contact: "9800000000".into(),
            password: Some("secret123".into()),
            identity_id: Some("uid-w1".into()),
        })
        .await;
    assert_eq!(app.flow.session().await.current_screen, Screen::VerifySignup);

    app.flow.dispatch(FlowEvent::Verified).await;
    let steps = [
        json!({ "photo": "file:///photos/ram.jpg" }),
        json!({ "nid": "12-34-56" }),
        json!({ "skills": ["Plumber", "Electrician"] }),
        json!({ "experience": "5 years" }),
    ];
    for step in steps {
        app.flow
            .dispatch(FlowEvent::StepComplete {
                fields: fields(step),
            })
            .await;
    }
    assert_eq!(app.flow.session().await.current_screen, Screen::WorkerReg5);

    let session = app
        .flow
        .dispatch(FlowEvent::Submitted {
            fields: fields(json!({ "address": "Kathmandu" })),
        })
        .await;

    assert_eq!(session.current_screen, Screen::Dashboard);
    assert_eq!(app.flow.view().await, FlowView::WorkerDashboard);

    let submissions = app.events.submissions.lock().unwrap().clone();
    assert_eq!(submissions.len(), 1);
    let (role, draft) = &submissions[0];
    assert_eq!(*role, Role::Worker);
    for key in ["photo", "nid", "skills", "experience", "address"] {
        assert!(draft.contains(key), "draft is missing {key}");
    }
    assert_eq!(draft.get("skills"), Some(&json!(["Plumber", "Electrician"])));

    assert_eq!(app.backend.completed_profiles().await, vec![IdentityId::from("uid-w1")]);
    assert_eq!(app.store.get(keys::PENDING_IDENTITY_ID).await.unwrap(), None);
    assert_eq!(snapshot_keys_present(&app.store).await, 3);
}

#[tokio::test]
async fn next_user_submit_never_completes_previous_users_identity() {
    let app = signed_out_app();

    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Employer,
            method: ContactMethod::Phone,
            contact: "9822222222".into(),
            password: Some("pw-a".into()),
            identity_id: Some("uid-a".into()),
        })
        .await;
    app.flow.dispatch(FlowEvent::LogoutRequested).await;
    assert_eq!(app.store.get(keys::PENDING_IDENTITY_ID).await.unwrap(), None);

    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Employer,
            method: ContactMethod::Email,
            contact: "b@example.com".into(),
            password: None,
            identity_id: None,
        })
        .await;
    app.flow.dispatch(FlowEvent::Verified).await;
    for step in [json!({ "company": "Acme" }), json!({ "sector": "Retail" })] {
        app.flow
            .dispatch(FlowEvent::StepComplete {
                fields: fields(step),
            })
            .await;
    }
    let session = app
        .flow
        .dispatch(FlowEvent::Submitted {
            fields: fields(json!({ "address": "Pokhara" })),
        })
        .await;

    assert_eq!(session.current_screen, Screen::Dashboard);
    assert!(app.backend.completed_profiles().await.is_empty());
}

#[tokio::test]
async fn signup_without_identity_drops_an_older_marker() {
    let app = signed_out_app();
    app.flow.restore().await;
    app.store
        .set(keys::PENDING_IDENTITY_ID, "uid-stale")
        .await
        .unwrap();

    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Worker,
            method: ContactMethod::Phone,
            contact: "9833333333".into(),
            password: Some("pw".into()),
            identity_id: None,
        })
        .await;

    assert_eq!(app.store.get(keys::PENDING_IDENTITY_ID).await.unwrap(), None);
}

#[tokio::test]
async fn snapshot_keys_are_all_or_nothing() {
    let app = signed_out_app();

    app.flow.dispatch(FlowEvent::RequestLogin).await;
    assert_eq!(snapshot_keys_present(&app.store).await, 0);

    app.flow
        .dispatch(FlowEvent::LoginSucceeded {
            role: Role::Employer,
            profile_complete: true,
            display_name: "Sita".into(),
        })
        .await;
    assert_eq!(snapshot_keys_present(&app.store).await, 3);

    app.flow.dispatch(FlowEvent::LogoutRequested).await;
    assert_eq!(snapshot_keys_present(&app.store).await, 0);
}

#[tokio::test]
async fn logout_then_restart_without_identity_starts_home() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let backend = Arc::new(StubBackend::signed_in(Duration::ZERO, "uid-e1"));
    let app = app_with(store.clone(), backend.clone());

    app.flow.dispatch(FlowEvent::RequestLogin).await;
    app.flow
        .dispatch(FlowEvent::LoginSucceeded {
            role: Role::Employer,
            profile_complete: false,
            display_name: "Sita".into(),
        })
        .await;
    let session = app.flow.dispatch(FlowEvent::LogoutRequested).await;
    assert_eq!(session.current_screen, Screen::Home);
    assert!(session.role.is_none());

    let restarted = app_with(store, backend);
    let session = restarted.flow.restore().await;

    assert_eq!(session.current_screen, Screen::Home);
    assert!(session.role.is_none());
    assert!(!session.is_loading);
}

#[tokio::test]
async fn restart_with_identity_resumes_wizard() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let backend = Arc::new(StubBackend::signed_in(Duration::ZERO, "uid-w2"));
    let app = app_with(store.clone(), backend.clone());

    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Worker,
            method: ContactMethod::Email,
            contact: "ram@example.com".into(),
            password: None,
            identity_id: None,
        })
        .await;
    app.flow.dispatch(FlowEvent::Verified).await;
    app.flow
        .dispatch(FlowEvent::StepComplete {
            fields: fields(json!({ "photo": "p.jpg" })),
        })
        .await;

    let restarted = app_with(store, backend);
    let session = restarted.flow.restore().await;

    assert_eq!(session.current_screen, Screen::WorkerReg2);
    assert_eq!(session.role, Some(Role::Worker));
    // Drafts are not persisted.
    assert!(restarted.flow.registration_draft(Role::Worker).await.is_empty());
}

#[tokio::test]
async fn persisted_login_screen_resumes_on_dashboard() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store
        .set_many(&[
            (keys::ROLE, "employer".to_string()),
            (keys::DISPLAY_NAME, "Sita".to_string()),
            (keys::CURRENT_SCREEN, "Login".to_string()),
        ])
        .await
        .unwrap();
    let app = app_with(store, Arc::new(StubBackend::signed_in(Duration::ZERO, "uid-e2")));

    let session = app.flow.restore().await;

    assert_eq!(session.current_screen, Screen::Dashboard);
    assert_eq!(app.flow.view().await, FlowView::EmployerDashboard);
}

#[tokio::test]
async fn external_sign_out_returns_to_home() {
    let backend = Arc::new(StubBackend::signed_in(Duration::ZERO, "uid-e3"));
    let app = app_with(Arc::new(InMemoryKeyValueStore::new()), backend.clone());
    app.flow.dispatch(FlowEvent::RequestLogin).await;
    app.flow
        .dispatch(FlowEvent::LoginSucceeded {
            role: Role::Employer,
            profile_complete: true,
            display_name: "Sita".into(),
        })
        .await;
    let _listener = app.flow.spawn_auth_listener().await.unwrap();

    backend.sign_out().await.unwrap();

    let mut session = app.flow.session().await;
    for _ in 0..50 {
        if session.current_screen == Screen::Home {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        session = app.flow.session().await;
    }
    assert_eq!(session.current_screen, Screen::Home);
    assert!(session.role.is_none());
    assert_eq!(snapshot_keys_present(&app.store).await, 0);
}

#[tokio::test]
async fn concurrent_dispatches_are_serialized() {
    let app = signed_out_app();
    app.flow.dispatch(FlowEvent::RequestSignup).await;
    app.flow
        .dispatch(FlowEvent::SignupSucceeded {
            role: Role::Employer,
            method: ContactMethod::Phone,
            contact: "9811111111".into(),
            password: Some("pw".into()),
            identity_id: None,
        })
        .await;
    app.flow.dispatch(FlowEvent::Verified).await;

    let first = app.flow.clone();
    let second = app.flow.clone();
    let (a, b) = tokio::join!(
        first.dispatch(FlowEvent::StepComplete {
            fields: fields(json!({ "company": "Acme" })),
        }),
        second.dispatch(FlowEvent::StepComplete {
            fields: fields(json!({ "sector": "Retail" })),
        }),
    );

    let mut screens = [a.current_screen, b.current_screen];
    screens.sort_by_key(|screen| screen.as_str());
    assert_eq!(screens, [Screen::EmployerReg2, Screen::EmployerReg3]);
    assert_eq!(app.flow.registration_draft(Role::Employer).await.len(), 2);
}
