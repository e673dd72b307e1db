//! Identity provider port
//!
//! Answers "who is signed in" and pushes auth changes. Implemented by the
//! backend adapter.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::ids::{AuthChange, Identity};

#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// Currently authenticated identity, if any.
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>>;

    /// Stream of auth changes from now on.
    async fn subscribe_auth_changes(&self) -> anyhow::Result<mpsc::Receiver<AuthChange>>;

    async fn sign_out(&self) -> anyhow::Result<()>;
}
