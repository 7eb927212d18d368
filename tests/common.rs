// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory Solid pod double, fixture documents and quiet test logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `solid_health_sync`
//!
//! [`MockPod`] keeps each document as a graph, serves it back as N-Triples,
//! applies typed updates structurally and records every request.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

use solid_health_sync::constants::fhir;
use solid_health_sync::errors::SyncResult;
use solid_health_sync::models::DataPoint;
use solid_health_sync::observations::{parse_observations, ObservationSet};
use solid_health_sync::pod::{GuardedPod, PodClient, PodResponse};
use solid_health_sync::rdf::{parse_turtle, Graph, Term, TripleStore, UpdateRequest};
use solid_health_sync::sync::GenerationToken;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const WEB_ID: &str = "https://alice.pod.example/profile/card#me";
pub const PROFILE_DOC: &str = "https://alice.pod.example/profile/card";
pub const TYPE_INDEX: &str = "https://alice.pod.example/settings/privateTypeIndex.ttl";
pub const HEALTH_CONTAINER: &str = "https://alice.pod.example/private/health/";
pub const OBSERVATION_DOC: &str = "https://alice.pod.example/private/health/fitness.ttl";

/// Profile document of [`WEB_ID`], optionally pointing at a type index
pub fn profile_turtle(type_index: Option<&str>) -> String {
    let mut body = String::from(
        "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
         @prefix solid: <http://www.w3.org/ns/solid/terms#> .\n\
         <#me> a foaf:Person ;\n\
         \x20   foaf:name \"Alice\" ;\n\
         \x20   foaf:img <https://alice.pod.example/profile/avatar.png> ;\n\
         \x20   foaf:knows <https://bob.pod.example/profile/card#me>",
    );
    if let Some(index) = type_index {
        body.push_str(&format!(" ;\n    solid:privateTypeIndex <{index}>"));
    }
    body.push_str(" .\n");
    body
}

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Get(String),
    Patch(String, UpdateRequest),
    Post {
        parent: String,
        slug: String,
        body: String,
    },
}

#[derive(Default)]
struct PodState {
    documents: HashMap<String, Graph>,
    raw: HashMap<String, PodResponse>,
    containers: HashSet<String>,
    requests: Vec<Recorded>,
    patches_seen: usize,
    patch_failures: HashMap<usize, u16>,
    post_status: Option<u16>,
    blank_counter: usize,
}

/// In-memory Solid pod
#[derive(Clone, Default)]
pub struct MockPod {
    state: Arc<Mutex<PodState>>,
}

impl MockPod {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pod with Alice's profile and an empty private type index
    pub fn with_profile() -> Self {
        let pod = Self::new();
        pod.put_turtle(PROFILE_DOC, &profile_turtle(Some(TYPE_INDEX)));
        pod.put_turtle(TYPE_INDEX, "");
        pod
    }

    /// Store a document parsed from Turtle
    pub fn put_turtle(&self, uri: &str, body: &str) {
        let mut graph = Graph::new();
        graph.extend(parse_turtle(uri, body).unwrap());
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(uri.to_owned(), graph);
    }

    /// Serve a fixed response for `uri` regardless of stored documents
    pub fn put_raw(&self, uri: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .raw
            .insert(uri.to_owned(), PodResponse::new(status, body));
    }

    /// Answer the `nth` PATCH (1-based) with `status` without applying it
    pub fn fail_patch(&self, nth: usize, status: u16) {
        self.state
            .lock()
            .unwrap()
            .patch_failures
            .insert(nth, status);
    }

    /// Answer every container POST with `status`
    pub fn set_post_status(&self, status: u16) {
        self.state.lock().unwrap().post_status = Some(status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn patches(&self) -> Vec<(String, UpdateRequest)> {
        self.requests()
            .into_iter()
            .filter_map(|request| match request {
                Recorded::Patch(uri, update) => Some((uri, update)),
                _ => None,
            })
            .collect()
    }

    /// PATCH and POST requests
    pub fn write_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| !matches!(request, Recorded::Get(_)))
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn document(&self, uri: &str) -> Option<Graph> {
        self.state.lock().unwrap().documents.get(uri).cloned()
    }

    pub fn has_container(&self, uri: &str) -> bool {
        self.state.lock().unwrap().containers.contains(uri)
    }

    /// Observations of [`WEB_ID`] currently stored in [`OBSERVATION_DOC`]
    pub fn observations(&self) -> ObservationSet {
        self.document(OBSERVATION_DOC)
            .map(|graph| parse_observations(&graph, WEB_ID))
            .unwrap_or_default()
    }

    pub fn guarded(&self) -> GuardedPod {
        GuardedPod::new(Arc::new(self.clone()), GenerationToken::detached())
    }
}

fn apply(state: &mut PodState, uri: &str, update: &UpdateRequest) {
    let PodState {
        documents,
        blank_counter,
        ..
    } = state;
    let graph = documents.entry(uri.to_owned()).or_default();
    match update {
        UpdateRequest::InsertData { blocks } => {
            let mut mint = || {
                *blank_counter += 1;
                Term::Blank(format!("mock{blank_counter}"))
            };
            for block in blocks {
                graph.extend(block.to_triples(&mut mint));
            }
        }
        UpdateRequest::ReplaceQuantityValue { resource, value } => {
            let resource = Term::named(resource.as_str());
            let view: &Graph = graph;
            let targets: Vec<Term> = view
                .query_all(&resource, fhir::OBSERVATION_VALUE_QUANTITY)
                .into_iter()
                .flat_map(|quantity| view.query_all(quantity, fhir::QUANTITY_VALUE))
                .cloned()
                .collect();
            let replacement = Term::from(value.clone());
            for target in &targets {
                graph.set_objects(target, fhir::VALUE, &replacement);
            }
        }
    }
}

#[async_trait]
impl PodClient for MockPod {
    async fn get(&self, uri: &str) -> SyncResult<PodResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Get(uri.to_owned()));
        if let Some(response) = state.raw.get(uri) {
            return Ok(response.clone());
        }
        Ok(state.documents.get(uri).map_or_else(
            || PodResponse::new(404, "Not Found"),
            |graph| PodResponse::new(200, graph.to_ntriples()),
        ))
    }

    async fn patch(&self, uri: &str, update: &UpdateRequest) -> SyncResult<PodResponse> {
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push(Recorded::Patch(uri.to_owned(), update.clone()));
        state.patches_seen += 1;
        let nth = state.patches_seen;
        if let Some(status) = state.patch_failures.get(&nth).copied() {
            return Ok(PodResponse::new(status, "injected failure"));
        }
        apply(&mut state, uri, update);
        Ok(PodResponse::new(200, ""))
    }

    async fn post_container(
        &self,
        parent: &str,
        slug: &str,
        body: &str,
    ) -> SyncResult<PodResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Post {
            parent: parent.to_owned(),
            slug: slug.to_owned(),
            body: body.to_owned(),
        });
        if let Some(status) = state.post_status {
            return Ok(PodResponse::new(status, "injected failure"));
        }
        let container = format!("{parent}{slug}/");
        if !state.containers.insert(container) {
            return Ok(PodResponse::new(409, "Conflict"));
        }
        Ok(PodResponse::new(201, ""))
    }
}

/// Daily samples `(date, value)` as provider points
pub fn daily(points: &[(&str, f64)]) -> Vec<DataPoint> {
    points
        .iter()
        .map(|(date, value)| DataPoint::new(*date, *value))
        .collect()
}
