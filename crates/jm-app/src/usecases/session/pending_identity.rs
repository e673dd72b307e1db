use std::sync::Arc;

use jm_core::ports::KeyValueStorePort;
use jm_core::session::keys;
use jm_core::IdentityId;

/// Transient `pendingIdentityId` marker.
///
/// Written when sign-up creates an identity, consumed when the registration
/// wizard submits.
pub struct PendingIdentityMarker {
    store: Arc<dyn KeyValueStorePort>,
}

impl PendingIdentityMarker {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub async fn remember(&self, identity_id: &IdentityId) -> anyhow::Result<()> {
        self.store
            .set(keys::PENDING_IDENTITY_ID, identity_id.as_str())
            .await
    }

    pub async fn get(&self) -> anyhow::Result<Option<IdentityId>> {
        Ok(self
            .store
            .get(keys::PENDING_IDENTITY_ID)
            .await?
            .filter(|id| !id.is_empty())
            .map(IdentityId::from))
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.store.remove(keys::PENDING_IDENTITY_ID).await
    }
}
