// ABOUTME: Integration tests for sessions, generation tokens and the session manager
// ABOUTME: Superseded runs, failed loads, snapshot queries and identity changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

use common::{init_test_logging, profile_turtle, MockPod, PROFILE_DOC, WEB_ID};
use solid_health_sync::config::EngineSettings;
use solid_health_sync::constants::status_messages;
use solid_health_sync::errors::{ErrorCode, SyncError};
use solid_health_sync::models::{DataPoint, MetricCategory};
use solid_health_sync::pod::GuardedPod;
use solid_health_sync::providers::{FitnessDataSource, ProviderResult, SyntheticSource};
use solid_health_sync::sync::{
    EngineState, GenerationCounter, Identity, Session, SessionManager, SyncBuses, SyncEngine,
};

const WAIT: Duration = Duration::from_secs(5);

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 15, 12, 0, 0).unwrap()
}

/// Source that starts a newer generation as soon as it is queried
struct IdentitySwitchingSource {
    inner: SyntheticSource,
    counter: GenerationCounter,
}

#[async_trait]
impl FitnessDataSource for IdentitySwitchingSource {
    fn name(&self) -> &'static str {
        "switching"
    }

    async fn get_samples(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>> {
        let _ = self.counter.advance();
        self.inner.get_samples(category, start, end).await
    }
}

#[tokio::test]
async fn test_superseded_run_stops_writing_and_publishing() {
    init_test_logging();
    let pod = MockPod::with_profile();
    let counter = GenerationCounter::new();
    let session = Arc::new(Session::new(
        WEB_ID,
        GuardedPod::new(Arc::new(pod.clone()), counter.advance()),
    ));

    let inner = SyntheticSource::new();
    inner.fill_daily(
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 3, 10).unwrap(),
    );
    let source = IdentitySwitchingSource {
        inner,
        counter: counter.clone(),
    };

    let buses = Arc::new(SyncBuses::default());
    let engine = SyncEngine::new(
        Arc::clone(&session),
        Arc::new(source),
        Arc::clone(&buses),
        Arc::new(EngineSettings::default()),
    );

    let err = engine.load_and_run(now()).await.unwrap_err();
    assert!(err.is_superseded());
    assert_eq!(err.code(), ErrorCode::RunSuperseded);

    // registration and document initialisation only, no observation batch
    assert_eq!(pod.patches().len(), 2);
    assert!(pod.observations().is_empty());

    // nothing is published once the generation moved on
    assert_eq!(buses.status.current().description, status_messages::DONE);
    assert!(matches!(
        buses.state.current(),
        EngineState::SyncingMonth(_)
    ));
}

#[tokio::test]
async fn test_missing_type_index_fails_load() {
    init_test_logging();
    let pod = MockPod::new();
    pod.put_turtle(PROFILE_DOC, &profile_turtle(None));

    let session = Arc::new(Session::new(WEB_ID, pod.guarded()));
    let buses = Arc::new(SyncBuses::default());
    let engine = SyncEngine::new(
        Arc::clone(&session),
        Arc::new(SyntheticSource::new()),
        Arc::clone(&buses),
        Arc::new(EngineSettings::default()),
    );

    let err = engine.load().await.unwrap_err();
    assert!(matches!(err, SyncError::MissingCapability { .. }));
    assert_eq!(pod.write_count(), 0);

    let status = buses.status.current();
    assert_eq!(status.description, status_messages::LOAD_FAILED);
    assert!(status.error.unwrap().contains("private type index"));

    // profile still reaches observers before the failure
    let profile = buses.profile.current().unwrap();
    assert_eq!(profile.name.as_deref(), Some("Alice"));
    assert!(profile.private_type_index.is_none());

    // waiters are released with an empty set
    assert!(!session.is_loading());
    let steps = timeout(WAIT, session.get_daily_steps(now() - ChronoDuration::days(30), now()))
        .await
        .unwrap();
    assert!(steps.is_empty());
}

#[tokio::test]
async fn test_unreadable_profile_fails_load() {
    init_test_logging();
    let pod = MockPod::new();
    pod.put_raw(PROFILE_DOC, 403, "Forbidden");

    let engine = SyncEngine::new(
        Arc::new(Session::new(WEB_ID, pod.guarded())),
        Arc::new(SyntheticSource::new()),
        Arc::new(SyncBuses::default()),
        Arc::new(EngineSettings::default()),
    );

    let err = engine.load().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NetworkError);
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_queries_wait_for_load() {
    init_test_logging();
    let pod = MockPod::with_profile();
    let source = SyntheticSource::new();
    source.fill_daily(
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 3, 5).unwrap(),
    );
    let first = SyncEngine::new(
        Arc::new(Session::new(WEB_ID, pod.guarded())),
        Arc::new(source),
        Arc::new(SyncBuses::default()),
        Arc::new(EngineSettings::default()),
    );
    first.load_and_run(now()).await.unwrap();

    let session = Arc::new(Session::new(WEB_ID, pod.guarded()));
    assert!(session.is_loading());

    let start = Utc.with_ymd_and_hms(2020, 3, 2, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2020, 3, 4, 0, 0, 0).unwrap();
    let waiter = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.get_daily_distance(start, end).await })
    };

    let engine = SyncEngine::new(
        Arc::clone(&session),
        Arc::new(SyntheticSource::new()),
        Arc::new(SyncBuses::default()),
        Arc::new(EngineSettings::default()),
    );
    engine.load().await.unwrap();

    let distance = timeout(WAIT, waiter).await.unwrap().unwrap();
    let dates: Vec<&str> = distance.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2020-03-02", "2020-03-03", "2020-03-04"]);

    let snapshot = session.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.observations.steps.len(), 5);
    assert!(session
        .get_heart_rate(start, end)
        .await
        .is_empty());
}

fn manager_with_recent_samples() -> Arc<SessionManager> {
    let today = Utc::now().date_naive();
    let source = SyntheticSource::new();
    source.fill_daily(today - ChronoDuration::days(2), today);
    Arc::new(SessionManager::new(
        Arc::new(source),
        EngineSettings::default(),
    ))
}

#[tokio::test]
async fn test_manager_runs_session_and_logs_out() {
    init_test_logging();
    let pod = MockPod::with_profile();
    let manager = manager_with_recent_samples();

    let run = manager
        .handle_identity(Some(Identity::new(WEB_ID, Arc::new(pod.clone()))))
        .await
        .unwrap();
    let summary = timeout(WAIT, run).await.unwrap().unwrap().unwrap();

    assert_eq!(summary.created, 6);
    assert_eq!(manager.generation(), 1);
    assert_eq!(
        manager.buses().status.current().description,
        status_messages::UP_TO_DATE
    );
    assert_eq!(
        manager.buses().profile.current().unwrap().web_id,
        WEB_ID
    );
    assert_eq!(manager.snapshot().await.observations.len(), 6);

    assert!(manager.handle_identity(None).await.is_none());
    assert_eq!(manager.generation(), 2);
    assert!(manager.current_session().await.is_none());
    assert!(manager.buses().profile.current().is_none());
    assert_eq!(
        manager.buses().status.current().description,
        status_messages::LOGGED_OUT
    );
    assert_eq!(manager.buses().state.current(), EngineState::Idle);
    assert!(manager.snapshot().await.observations.is_empty());
}

#[tokio::test]
async fn test_manager_follows_identity_stream() {
    init_test_logging();
    let pod = MockPod::with_profile();
    let manager = manager_with_recent_samples();

    let (identities, receiver) = watch::channel(None);
    let watcher = tokio::spawn(Arc::clone(&manager).watch(receiver));

    let mut status = manager.buses().status.subscribe();
    identities
        .send(Some(Identity::new(WEB_ID, Arc::new(pod.clone()))))
        .unwrap();
    timeout(
        WAIT,
        status.wait_for(|s| s.description == status_messages::UP_TO_DATE),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(manager.generation(), 1);

    identities.send(None).unwrap();
    timeout(
        WAIT,
        status.wait_for(|s| s.description == status_messages::LOGGED_OUT),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(manager.generation(), 2);

    drop(identities);
    timeout(WAIT, watcher).await.unwrap().unwrap();
}
