use async_trait::async_trait;

use crate::ids::IdentityId;

/// Backend call flagging a user's profile as complete.
#[async_trait]
pub trait ProfileCompletionPort: Send + Sync {
    async fn mark_profile_complete(&self, identity_id: &IdentityId) -> anyhow::Result<()>;
}
