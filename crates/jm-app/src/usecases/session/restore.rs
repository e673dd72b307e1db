use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use jm_core::ports::IdentityPort;
use jm_core::{FlowError, Session};

use super::{PendingIdentityMarker, SessionSnapshotStore};

/// Startup session restore.
///
/// This is the only place the flow reads the identity provider. It never
/// fails: every error degrades to a fresh session on `Home`.
pub struct RestoreSession {
    identity: Arc<dyn IdentityPort>,
    snapshots: Arc<SessionSnapshotStore>,
    pending_identity: Arc<PendingIdentityMarker>,
}

impl RestoreSession {
    pub fn new(
        identity: Arc<dyn IdentityPort>,
        snapshots: Arc<SessionSnapshotStore>,
        pending_identity: Arc<PendingIdentityMarker>,
    ) -> Self {
        Self {
            identity,
            snapshots,
            pending_identity,
        }
    }

    /// Returns the restored session with `is_loading` already cleared.
    pub async fn execute(&self) -> Session {
        let span = info_span!("usecase.restore_session.execute");
        async {
            let mut session = Session::new();
            session.is_loading = false;

            let identity = match self.identity.current_identity().await {
                Ok(identity) => identity,
                Err(err) => {
                    let err = FlowError::IdentityCheckFailed(err);
                    warn!(error = %err.report(), "treating identity check failure as signed out");
                    None
                }
            };

            let Some(identity) = identity else {
                if let Err(err) = self.snapshots.clear().await {
                    let err = FlowError::PersistenceFailed(err);
                    warn!(error = %err.report(), "failed to clear stale session snapshot");
                }
                if let Err(err) = self.pending_identity.clear().await {
                    let err = FlowError::PersistenceFailed(err);
                    warn!(error = %err.report(), "failed to clear stale pending identity");
                }
                info!("no authenticated identity; starting on Home");
                return session;
            };

            let snapshot = match self.snapshots.load().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    let err = FlowError::PersistenceFailed(err);
                    warn!(error = %err.report(), "failed to read session snapshot");
                    None
                }
            };

            let Some(snapshot) = snapshot else {
                info!(identity_id = %identity.id, "identity without stored role; starting on Home");
                return session;
            };

            session.role = Some(snapshot.role);
            session.display_name = snapshot.display_name.clone();
            session.current_screen = snapshot.resume_screen();
            if session.current_screen != snapshot.current_screen {
                info!(
                    stored = %snapshot.current_screen,
                    resumed = %session.current_screen,
                    "stored screen is not resumable"
                );
            }

            info!(
                identity_id = %identity.id,
                role = %snapshot.role,
                screen = %session.current_screen,
                "session restored"
            );
            session
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jm_core::ports::KeyValueStorePort;
    use jm_core::session::keys;
    use jm_core::{AuthChange, Identity, Role, Screen};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    enum IdentityReply {
        SignedIn(&'static str),
        SignedOut,
        Fails,
    }

    struct MockIdentity {
        reply: IdentityReply,
    }

    #[async_trait::async_trait]
    impl IdentityPort for MockIdentity {
        async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
            match self.reply {
                IdentityReply::SignedIn(id) => Ok(Some(Identity { id: id.into() })),
                IdentityReply::SignedOut => Ok(None),
                IdentityReply::Fails => Err(anyhow::anyhow!("network unreachable")),
            }
        }

        async fn subscribe_auth_changes(&self) -> anyhow::Result<mpsc::Receiver<AuthChange>> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn sign_out(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let store = Self::default();
            for (key, value) in entries {
                store
                    .data
                    .lock()
                    .unwrap()
                    .insert(key.to_string(), value.to_string());
            }
            Arc::new(store)
        }

        fn is_empty(&self) -> bool {
            self.data.lock().unwrap().is_empty()
        }
    }

    #[async_trait::async_trait]
    impl KeyValueStorePort for MemoryStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn restore(reply: IdentityReply, store: Arc<MemoryStore>) -> RestoreSession {
        RestoreSession::new(
            Arc::new(MockIdentity { reply }),
            Arc::new(SessionSnapshotStore::new(store.clone())),
            Arc::new(PendingIdentityMarker::new(store)),
        )
    }

    #[tokio::test]
    async fn no_identity_clears_snapshot_and_starts_home() {
        let store = MemoryStore::with(&[
            (keys::ROLE, "worker"),
            (keys::DISPLAY_NAME, "Ram"),
            (keys::CURRENT_SCREEN, "WorkerReg2"),
        ]);

        let session = restore(IdentityReply::SignedOut, store.clone()).execute().await;

        assert_eq!(session.current_screen, Screen::Home);
        assert!(!session.is_loading);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn no_identity_drops_leftover_pending_identity() {
        let store = MemoryStore::with(&[(keys::PENDING_IDENTITY_ID, "uid-old")]);

        restore(IdentityReply::SignedOut, store.clone()).execute().await;

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn identity_check_failure_is_treated_as_signed_out() {
        let store = MemoryStore::with(&[(keys::ROLE, "worker")]);

        let session = restore(IdentityReply::Fails, store.clone()).execute().await;

        assert_eq!(session.current_screen, Screen::Home);
        assert!(session.role.is_none());
        assert!(!session.is_loading);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn identity_without_role_stays_home() {
        let store = MemoryStore::with(&[(keys::CURRENT_SCREEN, "Dashboard")]);

        let session = restore(IdentityReply::SignedIn("uid-1"), store).execute().await;

        assert_eq!(session.current_screen, Screen::Home);
        assert!(session.role.is_none());
    }

    #[tokio::test]
    async fn persisted_login_screen_resumes_on_dashboard() {
        let store = MemoryStore::with(&[
            (keys::ROLE, "employer"),
            (keys::DISPLAY_NAME, "Sita"),
            (keys::CURRENT_SCREEN, "Login"),
        ]);

        let session = restore(IdentityReply::SignedIn("uid-2"), store).execute().await;

        assert_eq!(session.current_screen, Screen::Dashboard);
        assert_eq!(session.role, Some(Role::Employer));
        assert_eq!(session.display_name, "Sita");
    }

    #[tokio::test]
    async fn wizard_screen_is_resumed_with_default_name() {
        let store = MemoryStore::with(&[
            (keys::ROLE, "worker"),
            (keys::CURRENT_SCREEN, "WorkerReg4"),
        ]);

        let session = restore(IdentityReply::SignedIn("uid-3"), store).execute().await;

        assert_eq!(session.current_screen, Screen::WorkerReg4);
        assert_eq!(session.display_name, "User");
    }
}
