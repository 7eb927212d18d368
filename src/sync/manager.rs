// ABOUTME: Session manager reacting to identity changes from the login layer
// ABOUTME: Bumps the generation, replaces the session and spawns the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::engine::{EngineState, RunSummary, SyncBuses, SyncEngine};
use super::generation::GenerationCounter;
use super::session::{FitnessSnapshot, Session};
use crate::config::EngineSettings;
use crate::pod::{GuardedPod, PodClient};
use solid_health_core::constants::status_messages;
use solid_health_core::errors::SyncResult;
use solid_health_core::models::SyncStatus;
use solid_health_providers::FitnessDataSource;

/// Signed-in identity with its authenticated fetch capability
#[derive(Clone)]
pub struct Identity {
    /// WebID of the user
    pub web_id: String,
    /// Authenticated pod access
    pub client: Arc<dyn PodClient>,
}

impl Identity {
    /// Identity for `web_id` reading and writing through `client`
    pub fn new(web_id: impl Into<String>, client: Arc<dyn PodClient>) -> Self {
        Self {
            web_id: web_id.into(),
            client,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("web_id", &self.web_id)
            .finish_non_exhaustive()
    }
}

/// Owns the active session and restarts sync on identity changes
///
/// Each change invalidates the previous run through the generation counter,
/// so at most one run keeps writing at a time.
pub struct SessionManager {
    counter: GenerationCounter,
    buses: Arc<SyncBuses>,
    source: Arc<dyn FitnessDataSource>,
    settings: Arc<EngineSettings>,
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionManager {
    /// Manager pulling samples from `source`
    #[must_use]
    pub fn new(source: Arc<dyn FitnessDataSource>, settings: EngineSettings) -> Self {
        Self {
            counter: GenerationCounter::new(),
            buses: Arc::new(SyncBuses::default()),
            source,
            settings: Arc::new(settings),
            current: RwLock::new(None),
        }
    }

    /// Status, profile and state channels
    #[must_use]
    pub const fn buses(&self) -> &Arc<SyncBuses> {
        &self.buses
    }

    /// Current generation number
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.counter.current()
    }

    /// Session of the active identity
    pub async fn current_session(&self) -> Option<Arc<Session>> {
        self.current.read().await.clone()
    }

    /// Snapshot of the active session, empty when logged out
    pub async fn snapshot(&self) -> FitnessSnapshot {
        match self.current_session().await {
            Some(session) => session.snapshot().await,
            None => FitnessSnapshot::default(),
        }
    }

    /// React to a login, logout or identity switch
    ///
    /// Returns the handle of the spawned run when an identity is active.
    pub async fn handle_identity(
        &self,
        identity: Option<Identity>,
    ) -> Option<JoinHandle<SyncResult<RunSummary>>> {
        let token = self.counter.advance();

        let Some(identity) = identity else {
            info!(generation = token.generation(), "Identity cleared");
            *self.current.write().await = None;
            self.buses.profile.publish(None);
            self.buses.state.publish(EngineState::Idle);
            self.buses
                .status
                .publish(SyncStatus::indeterminate(status_messages::LOGGED_OUT));
            return None;
        };

        info!(
            generation = token.generation(),
            "Starting session for {}", identity.web_id
        );
        let session = Arc::new(Session::new(
            identity.web_id,
            GuardedPod::new(identity.client, token),
        ));
        *self.current.write().await = Some(Arc::clone(&session));
        self.buses.profile.publish(None);
        self.buses.status.publish(SyncStatus::default());

        let engine = SyncEngine::new(
            session,
            Arc::clone(&self.source),
            Arc::clone(&self.buses),
            Arc::clone(&self.settings),
        );
        Some(tokio::spawn(
            async move { engine.load_and_run(Utc::now()).await },
        ))
    }

    /// Follow an identity stream until its sender is dropped
    pub async fn watch(self: Arc<Self>, mut identities: watch::Receiver<Option<Identity>>) {
        let initial = identities.borrow_and_update().clone();
        if initial.is_some() {
            self.handle_identity(initial).await;
        }
        while identities.changed().await.is_ok() {
            let identity = identities.borrow_and_update().clone();
            self.handle_identity(identity).await;
        }
        debug!("Identity stream closed");
    }
}
