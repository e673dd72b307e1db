use std::sync::Arc;

use tracing::info;

use jm_core::ports::ProfileCompletionPort;
use jm_core::{FlowError, IdentityId};

use super::PendingIdentityMarker;

/// Use case for marking the signed-up profile as complete.
///
/// Resolves the identity from the pending marker and calls the backend.
/// Returns the identity that was marked, or `None` when no sign-up is
/// pending (a returning user finishing the wizard later).
pub struct MarkProfileComplete {
    pending_identity: Arc<PendingIdentityMarker>,
    profile: Arc<dyn ProfileCompletionPort>,
}

impl MarkProfileComplete {
    pub fn new(
        pending_identity: Arc<PendingIdentityMarker>,
        profile: Arc<dyn ProfileCompletionPort>,
    ) -> Self {
        Self {
            pending_identity,
            profile,
        }
    }

    pub async fn execute(&self) -> Result<Option<IdentityId>, FlowError> {
        let identity_id = self
            .pending_identity
            .get()
            .await
            .map_err(FlowError::PersistenceFailed)?;

        let Some(identity_id) = identity_id else {
            info!("no pending identity; skipping profile completion");
            return Ok(None);
        };

        self.profile
            .mark_profile_complete(&identity_id)
            .await
            .map_err(FlowError::ProfileCompletionFailed)?;

        info!(identity_id = %identity_id, "profile marked complete");
        Ok(Some(identity_id))
    }
}
