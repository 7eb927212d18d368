// ABOUTME: Reconciliation engine driving the load chain and the backward month loop
// ABOUTME: Publishes status, profile and state on single-slot buses while current
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sync engine
//!
//! One engine drives one [`Session`]:
//!
//! 1. load chain: profile, private type index, observation document
//! 2. month loop: starting with the month containing "now", reconcile and
//!    walk backwards while the previous month created observations
//!
//! Any failure ends the run with a terminal status. There is no retry; the
//! next identity change starts a fresh run. A superseded run goes quiet: it
//! neither writes nor publishes.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::bus::Bus;
use super::month::MonthWindow;
use super::reconcile::{plan_month, Create, Modify, MonthSamples, ReconcileRules};
use super::session::Session;
use crate::config::EngineSettings;
use crate::observations::{EncodedObservation, ObservationCodec, ObservationSet, ObservationStore};
use crate::pod::document_of;
use crate::profile::ProfileLoader;
use crate::rdf::{TripleBlock, UpdateRequest};
use crate::type_index::TypeIndexResolver;
use solid_health_core::constants::status_messages;
use solid_health_core::errors::{SyncError, SyncResult};
use solid_health_core::models::{MetricCategory, Profile, SyncStatus};
use solid_health_providers::FitnessDataSource;

/// Phase of the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing running
    #[default]
    Idle,
    /// Fetching the WebID profile
    LoadingProfile,
    /// Resolving the observation document
    LoadingTypeIndex,
    /// Fetching stored observations
    LoadingObservations,
    /// Load chain done, month loop not started
    Ready,
    /// Reconciling one month
    SyncingMonth(MonthWindow),
    /// Run ended with the given error text
    Failed(String),
}

/// Broadcast channels observed by the UI layer
#[derive(Debug)]
pub struct SyncBuses {
    /// Progress of the current run
    pub status: Bus<SyncStatus>,
    /// Profile of the active identity, `None` when logged out
    pub profile: Bus<Option<Profile>>,
    /// Engine phase
    pub state: Bus<EngineState>,
}

impl Default for SyncBuses {
    fn default() -> Self {
        Self {
            status: Bus::new(SyncStatus::default()),
            profile: Bus::new(None),
            state: Bus::new(EngineState::Idle),
        }
    }
}

/// Result of a successful load chain
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    /// Profile of the identity
    pub profile: Profile,
    /// Absolute URI of the observation document
    pub document: String,
}

/// Work done by a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Months reconciled
    pub months: u32,
    /// Stored values overwritten
    pub modified: usize,
    /// Observations uploaded
    pub created: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct MonthOutcome {
    modified: usize,
    created: usize,
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Drives the load chain and the reconciliation loop of one session
pub struct SyncEngine {
    session: Arc<Session>,
    source: Arc<dyn FitnessDataSource>,
    buses: Arc<SyncBuses>,
    settings: Arc<EngineSettings>,
}

impl SyncEngine {
    /// Engine for `session` pulling samples from `source`
    #[must_use]
    pub fn new(
        session: Arc<Session>,
        source: Arc<dyn FitnessDataSource>,
        buses: Arc<SyncBuses>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        Self {
            session,
            source,
            buses,
            settings,
        }
    }

    /// Session this engine works on
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn is_current(&self) -> bool {
        self.session.pod().token().is_current()
    }

    fn publish_status(&self, status: SyncStatus) {
        if self.is_current() {
            self.buses.status.publish(status);
        } else {
            debug!(
                generation = self.session.generation(),
                "dropping status from superseded run: {}", status.description
            );
        }
    }

    fn publish_state(&self, state: EngineState) {
        if self.is_current() {
            self.buses.state.publish(state);
        }
    }

    /// Load chain followed by the month loop
    ///
    /// # Errors
    ///
    /// Returns the first error of either phase.
    pub async fn load_and_run(&self, now: DateTime<Utc>) -> SyncResult<RunSummary> {
        let loaded = self.load().await?;
        self.run(&loaded.document, now).await
    }

    /// Load the profile, resolve the observation document and read it
    ///
    /// The session stops loading whatever the outcome, so snapshot queries
    /// never wait forever.
    ///
    /// # Errors
    ///
    /// - `SyncError::MissingCapability` when the profile has no private type index
    /// - `SyncError::BootstrapFailure` when the type index cannot be set up
    /// - transport, parse and superseded errors of the individual loads
    #[instrument(skip(self), fields(web_id = %self.session.web_id()))]
    pub async fn load(&self) -> SyncResult<LoadedSession> {
        match self.load_chain().await {
            Ok(loaded) => {
                self.publish_status(SyncStatus::complete(status_messages::DONE));
                self.publish_state(EngineState::Ready);
                Ok(loaded)
            }
            Err(err) => {
                self.session.finish_loading(ObservationSet::default()).await;
                if err.is_superseded() {
                    info!("Load superseded by a newer identity");
                } else {
                    error!(code = ?err.code(), "Load failed: {err}");
                    self.publish_status(SyncStatus::failed(
                        status_messages::LOAD_FAILED,
                        err.to_string(),
                    ));
                    self.publish_state(EngineState::Failed(err.to_string()));
                }
                Err(err)
            }
        }
    }

    async fn load_chain(&self) -> SyncResult<LoadedSession> {
        let pod = self.session.pod();
        let web_id = self.session.web_id();

        self.publish_state(EngineState::LoadingProfile);
        self.publish_status(SyncStatus::indeterminate(status_messages::LOADING_PROFILE));
        let profile = ProfileLoader::new(pod).load(web_id).await?;
        if self.is_current() {
            self.buses.profile.publish(Some(profile.clone()));
        }

        let type_index =
            profile
                .private_type_index
                .clone()
                .ok_or_else(|| SyncError::MissingCapability {
                    web_id: web_id.to_owned(),
                    capability: "private type index",
                })?;

        self.publish_state(EngineState::LoadingTypeIndex);
        self.publish_status(SyncStatus::indeterminate(status_messages::LOADING_TYPE_INDEX));
        let document = TypeIndexResolver::new(pod, self.settings.layout.clone())
            .resolve(&type_index)
            .await?;

        self.publish_state(EngineState::LoadingObservations);
        self.publish_status(SyncStatus::indeterminate(status_messages::LOADING_OBSERVATIONS));
        let observations = ObservationStore::new(pod, web_id, document.as_str())
            .load()
            .await?;
        info!(
            steps = observations.steps.len(),
            distance = observations.distance.len(),
            heart_rate = observations.heart_rate.len(),
            skipped = observations.skipped,
            "Loaded observations from {document}"
        );
        self.session.finish_loading(observations).await;

        Ok(LoadedSession { profile, document })
    }

    /// Reconcile months backwards starting with the month containing `now`
    ///
    /// Stops after the first month that needed no uploads, or when the
    /// configured month limit is reached.
    ///
    /// # Errors
    ///
    /// - `SyncError::RemoteRejection` when a MODIFY or an upload batch is refused
    /// - `SyncError::Provider` when samples cannot be fetched
    /// - `SyncError::Superseded` once a newer identity took over
    #[instrument(skip(self, document), fields(web_id = %self.session.web_id()))]
    pub async fn run(&self, document: &str, now: DateTime<Utc>) -> SyncResult<RunSummary> {
        let codec = ObservationCodec::new(self.session.web_id(), document);
        let rules = ReconcileRules::from(self.settings.as_ref());
        let mut summary = RunSummary::default();
        let mut month = MonthWindow::containing(now);

        loop {
            self.publish_state(EngineState::SyncingMonth(month));
            let outcome = match self.sync_month(&codec, &rules, month).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.fail_run(&err);
                    return Err(err);
                }
            };

            summary.months += 1;
            summary.modified += outcome.modified;
            summary.created += outcome.created;
            info!(
                month = %month,
                modified = outcome.modified,
                created = outcome.created,
                "Month reconciled"
            );

            if outcome.created == 0 {
                self.publish_status(SyncStatus::complete(status_messages::UP_TO_DATE));
                break;
            }
            if self
                .settings
                .max_months
                .is_some_and(|limit| summary.months >= limit)
            {
                warn!("Month limit reached after {}", month.label());
                self.publish_status(SyncStatus::complete(status_messages::DONE));
                break;
            }
            month = month.previous();
        }

        self.publish_state(EngineState::Idle);
        Ok(summary)
    }

    fn fail_run(&self, err: &SyncError) {
        if err.is_superseded() {
            info!("Run superseded by a newer identity");
            return;
        }
        error!(code = ?err.code(), "Sync failed: {err}");
        self.publish_status(SyncStatus::failed(
            status_messages::SYNC_FAILED,
            err.to_string(),
        ));
        self.publish_state(EngineState::Failed(err.to_string()));
    }

    async fn sync_month(
        &self,
        codec: &ObservationCodec,
        rules: &ReconcileRules,
        month: MonthWindow,
    ) -> SyncResult<MonthOutcome> {
        self.session.pod().token().ensure_current()?;
        debug!("Reconciling {month} with {}", self.source.name());

        let (steps, distance, heart_rate) = tokio::try_join!(
            self.source
                .get_samples(MetricCategory::Steps, month.start, month.end),
            self.source
                .get_samples(MetricCategory::Distance, month.start, month.end),
            self.source
                .get_samples(MetricCategory::HeartRate, month.start, month.end),
        )?;
        let samples = MonthSamples {
            steps,
            distance,
            heart_rate,
        };

        let stored = self.session.window(month.start, month.end).await;
        let plan = plan_month(&samples, &stored, rules);
        let label = month.label();

        let modified = self.apply_modifies(&plan.modifies, &label).await?;
        let created = self.upload_creates(codec, &plan.creates, &label).await?;
        Ok(MonthOutcome { modified, created })
    }

    async fn apply_modifies(&self, modifies: &[Modify], label: &str) -> SyncResult<usize> {
        if modifies.is_empty() {
            return Ok(0);
        }
        let description = format!("{} {label}", status_messages::UPDATING);
        let total = count(modifies.len());
        self.publish_status(SyncStatus::progress(&description, 0, total));

        for (index, modify) in modifies.iter().enumerate() {
            let document = document_of(&modify.point.uri)?;
            let update = UpdateRequest::replace_value(modify.point.uri.as_str(), modify.value);
            let response = self.session.pod().patch(&document, &update).await?;
            if !response.is_success() {
                return Err(SyncError::RemoteRejection {
                    method: "PATCH",
                    uri: document,
                    status: response.status,
                    body: response.body,
                });
            }
            self.session
                .update_value(&modify.point.uri, modify.value)
                .await;
            self.publish_status(SyncStatus::progress(&description, count(index + 1), total));
        }
        Ok(modifies.len())
    }

    async fn upload_creates(
        &self,
        codec: &ObservationCodec,
        creates: &[Create],
        label: &str,
    ) -> SyncResult<usize> {
        let mut encoded: Vec<EncodedObservation> = Vec::with_capacity(creates.len());
        for create in creates {
            if let Some(observation) = codec.encode(&create.point, create.category) {
                self.session
                    .append(create.category, observation.point.clone())
                    .await;
                encoded.push(observation);
            }
        }
        if encoded.is_empty() {
            return Ok(0);
        }

        let description = format!("{} {label}", status_messages::SYNCING);
        let created = encoded.len();
        let total = count(created);
        let batch_size = self.settings.batch_size.max(1);
        self.publish_status(SyncStatus::progress(&description, 0, total));

        let mut uploaded = 0;
        let mut pending = encoded.into_iter();
        loop {
            let batch: Vec<EncodedObservation> = pending.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let size = batch.len();
            let blocks: Vec<TripleBlock> = batch
                .into_iter()
                .flat_map(EncodedObservation::into_blocks)
                .collect();

            let response = self
                .session
                .pod()
                .patch(codec.document(), &UpdateRequest::insert(blocks))
                .await?;
            if !response.is_success() {
                return Err(SyncError::RemoteRejection {
                    method: "PATCH",
                    uri: codec.document().to_owned(),
                    status: response.status,
                    body: response.body,
                });
            }

            uploaded += size;
            debug!("Uploaded {uploaded}/{created} observations for {label}");
            self.publish_status(SyncStatus::progress(&description, count(uploaded), total));
        }
        Ok(created)
    }
}
