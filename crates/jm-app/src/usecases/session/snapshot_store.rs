use std::sync::Arc;

use tracing::{debug, warn};

use jm_core::ports::KeyValueStorePort;
use jm_core::session::{keys, DEFAULT_DISPLAY_NAME};
use jm_core::{Role, Screen, SessionSnapshot};

/// Reads and writes the `{role, displayName, currentScreen}` triple.
///
/// The three keys are only ever written or removed together. A failed write
/// is rolled back so the store never holds a partial snapshot.
pub struct SessionSnapshotStore {
    store: Arc<dyn KeyValueStorePort>,
}

impl SessionSnapshotStore {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Loads the snapshot. `None` when no usable role is stored.
    ///
    /// A missing display name defaults to `"User"`; a missing or unknown
    /// screen name resumes on the dashboard.
    pub async fn load(&self) -> anyhow::Result<Option<SessionSnapshot>> {
        let Some(raw_role) = self.store.get(keys::ROLE).await? else {
            return Ok(None);
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(err) => {
                warn!(error = %err, "stored role is unreadable; ignoring snapshot");
                return Ok(None);
            }
        };

        let display_name = self
            .store
            .get(keys::DISPLAY_NAME)
            .await?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        let current_screen = match self.store.get(keys::CURRENT_SCREEN).await? {
            Some(raw) => raw.parse::<Screen>().unwrap_or_else(|err| {
                warn!(error = %err, "stored screen is unreadable; resuming on dashboard");
                Screen::Dashboard
            }),
            None => Screen::Dashboard,
        };

        Ok(Some(SessionSnapshot {
            role,
            display_name,
            current_screen,
        }))
    }

    pub async fn save(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        let entries = [
            (keys::ROLE, snapshot.role.as_str().to_string()),
            (keys::DISPLAY_NAME, snapshot.display_name.clone()),
            (keys::CURRENT_SCREEN, snapshot.current_screen.as_str().to_string()),
        ];

        if let Err(err) = self.store.set_many(&entries).await {
            if let Err(rollback_err) = self.store.remove_many(&keys::SNAPSHOT).await {
                warn!(error = %rollback_err, "failed to roll back partial session snapshot");
            }
            return Err(err.context("failed to write session snapshot"));
        }

        debug!(
            role = %snapshot.role,
            screen = %snapshot.current_screen,
            "session snapshot saved"
        );
        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.store
            .remove_many(&keys::SNAPSHOT)
            .await
            .map_err(|err| err.context("failed to clear session snapshot"))
    }
}
