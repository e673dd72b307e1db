//! In-process stand-in for the hosted auth and profile backend.
//!
//! Answers identity queries from memory after an optional simulated delay.
//! Useful for running the shell without network access and for tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use jm_core::ports::{IdentityPort, ProfileCompletionPort};
use jm_core::{AuthChange, Identity, IdentityId};

const AUTH_CHANGE_BUFFER: usize = 16;

pub struct StubBackend {
    latency: Duration,
    identity: Mutex<Option<Identity>>,
    completed_profiles: Mutex<Vec<IdentityId>>,
    subscribers: Mutex<Vec<mpsc::Sender<AuthChange>>>,
}

impl StubBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            identity: Mutex::new(None),
            completed_profiles: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Starts with `identity_id` signed in. An empty id means signed out.
    pub fn signed_in(latency: Duration, identity_id: impl Into<String>) -> Self {
        let identity_id = identity_id.into();
        let identity = (!identity_id.is_empty()).then(|| Identity {
            id: IdentityId::new(identity_id),
        });
        Self {
            identity: Mutex::new(identity),
            ..Self::new(latency)
        }
    }

    /// Signs `identity_id` in and notifies subscribers.
    pub async fn sign_in(&self, identity_id: impl Into<IdentityId>) {
        let identity = Identity {
            id: identity_id.into(),
        };
        info!(identity_id = %identity.id, "stub backend: signed in");
        *self.identity.lock().await = Some(identity.clone());
        self.notify(AuthChange::SignedIn(identity)).await;
    }

    pub async fn completed_profiles(&self) -> Vec<IdentityId> {
        self.completed_profiles.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Never blocks: a full or closed subscriber misses the change.
    async fn notify(&self, change: AuthChange) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|sender| !sender.is_closed());
        for sender in subscribers.iter() {
            if let Err(err) = sender.try_send(change.clone()) {
                debug!(error = %err, "auth change subscriber skipped");
            }
        }
    }
}

#[async_trait]
impl IdentityPort for StubBackend {
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
        self.simulate_latency().await;
        Ok(self.identity.lock().await.clone())
    }

    async fn subscribe_auth_changes(&self) -> anyhow::Result<mpsc::Receiver<AuthChange>> {
        let (tx, rx) = mpsc::channel(AUTH_CHANGE_BUFFER);
        self.subscribers.lock().await.push(tx);
        Ok(rx)
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.simulate_latency().await;
        let previous = self.identity.lock().await.take();
        if let Some(identity) = previous {
            info!(identity_id = %identity.id, "stub backend: signed out");
            self.notify(AuthChange::SignedOut).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileCompletionPort for StubBackend {
    async fn mark_profile_complete(&self, identity_id: &IdentityId) -> anyhow::Result<()> {
        self.simulate_latency().await;
        info!(identity_id = %identity_id, "stub backend: profile marked complete");
        self.completed_profiles.lock().await.push(identity_id.clone());
        Ok(())
    }
}
