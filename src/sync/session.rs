// ABOUTME: Per-identity session owning the pod handle and the observation snapshot
// ABOUTME: Snapshot queries wait for the load chain before answering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::observations::ObservationSet;
use crate::pod::GuardedPod;
use solid_health_core::models::{MetricCategory, PodDataPoint};

/// Point-in-time copy of a session's pod data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessSnapshot {
    /// Whether the load chain is still running
    pub loading: bool,
    /// Observations known so far
    pub observations: ObservationSet,
}

/// State of one signed-in identity
///
/// A fresh session is built on every identity change, so a stale run can
/// never touch the snapshot of its successor.
pub struct Session {
    web_id: String,
    pod: GuardedPod,
    observations: RwLock<ObservationSet>,
    loading: watch::Sender<bool>,
}

impl Session {
    /// Empty session in the loading state
    #[must_use]
    pub fn new(web_id: impl Into<String>, pod: GuardedPod) -> Self {
        let (loading, _) = watch::channel(true);
        Self {
            web_id: web_id.into(),
            pod,
            observations: RwLock::new(ObservationSet::default()),
            loading,
        }
    }

    /// Identity this session belongs to
    #[must_use]
    pub fn web_id(&self) -> &str {
        &self.web_id
    }

    /// Generation-guarded pod access
    #[must_use]
    pub const fn pod(&self) -> &GuardedPod {
        &self.pod
    }

    /// Generation the session was created for
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.pod.token().generation()
    }

    /// Whether the load chain has not finished yet
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Install the loaded observations and release waiting queries
    ///
    /// Also called with an empty set when loading fails so queries never hang.
    pub async fn finish_loading(&self, observations: ObservationSet) {
        *self.observations.write().await = observations;
        self.loading.send_replace(false);
    }

    /// Resolve once the load chain has finished
    pub async fn wait_loaded(&self) {
        let mut receiver = self.loading.subscribe();
        if receiver.wait_for(|loading| !*loading).await.is_err() {
            debug!("loading flag closed for {}", self.web_id);
        }
    }

    /// Copy of the current state without waiting
    pub async fn snapshot(&self) -> FitnessSnapshot {
        FitnessSnapshot {
            loading: self.is_loading(),
            observations: self.observations.read().await.clone(),
        }
    }

    /// Observations of every category inside the inclusive window
    pub async fn window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ObservationSet {
        let observations = self.observations.read().await;
        let mut window = ObservationSet::default();
        for category in MetricCategory::ALL {
            for point in observations.within(category, start, end) {
                window.push(category, point);
            }
        }
        window
    }

    /// Daily step counts stored in the pod within the window
    pub async fn get_daily_steps(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PodDataPoint> {
        self.query(MetricCategory::Steps, start, end).await
    }

    /// Daily distances stored in the pod within the window
    pub async fn get_daily_distance(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PodDataPoint> {
        self.query(MetricCategory::Distance, start, end).await
    }

    /// Heart-rate readings stored in the pod within the window
    pub async fn get_heart_rate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PodDataPoint> {
        self.query(MetricCategory::HeartRate, start, end).await
    }

    async fn query(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PodDataPoint> {
        self.wait_loaded().await;
        self.observations.read().await.within(category, start, end)
    }

    /// Record a newly created observation before the server confirms it
    pub async fn append(&self, category: MetricCategory, point: PodDataPoint) {
        self.observations.write().await.push(category, point);
    }

    /// Reflect an applied MODIFY; returns whether the resource was known
    pub async fn update_value(&self, uri: &str, value: f64) -> bool {
        let mut guard = self.observations.write().await;
        let observations = &mut *guard;
        let mut updated = false;
        for points in [
            &mut observations.steps,
            &mut observations.distance,
            &mut observations.heart_rate,
        ] {
            for point in points.iter_mut().filter(|point| point.uri == uri) {
                point.value = value;
                updated = true;
            }
        }
        updated
    }
}
