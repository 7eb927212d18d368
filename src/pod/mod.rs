// ABOUTME: Pod document protocol: GET Turtle, PATCH SPARQL-Update, POST containers
// ABOUTME: Transport trait, reqwest implementation, generation guard and graph fetcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pod access
//!
//! [`PodClient`] is the authenticated fetch capability supplied by the
//! identity layer. Transport failures are `Err`; any HTTP status, including
//! 4xx and 5xx, is an `Ok(PodResponse)` so each caller decides what a
//! rejection means in its context.
//!
//! [`GuardedPod`] wraps a client with the run's generation token and refuses
//! every write once the run is stale.

/// Document fetcher loading Turtle into a graph
pub mod fetcher;
/// reqwest-backed client
pub mod http;

pub use fetcher::Fetcher;
pub use http::HttpPodClient;

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::rdf::UpdateRequest;
use crate::sync::generation::GenerationToken;
use solid_health_core::errors::{SyncError, SyncResult};

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, possibly empty
    pub body: String,
}

impl PodResponse {
    /// Build a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Authenticated access to pod documents
#[async_trait]
pub trait PodClient: Send + Sync {
    /// `GET uri` asking for Turtle
    async fn get(&self, uri: &str) -> SyncResult<PodResponse>;

    /// `PATCH uri` with a SPARQL-Update body
    async fn patch(&self, uri: &str, update: &UpdateRequest) -> SyncResult<PodResponse>;

    /// `POST parent` creating a basic container named after `slug`
    async fn post_container(&self, parent: &str, slug: &str, body: &str)
        -> SyncResult<PodResponse>;
}

/// Pod client bound to one sync generation
///
/// Reads always go through. Writes first check the token and fail with
/// `SyncError::Superseded` once a newer identity took over.
#[derive(Clone)]
pub struct GuardedPod {
    client: Arc<dyn PodClient>,
    token: GenerationToken,
}

impl GuardedPod {
    /// Guard `client` with `token`
    #[must_use]
    pub fn new(client: Arc<dyn PodClient>, token: GenerationToken) -> Self {
        Self { client, token }
    }

    /// Generation this pod handle writes for
    #[must_use]
    pub const fn token(&self) -> &GenerationToken {
        &self.token
    }

    /// Unguarded `GET`
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn get(&self, uri: &str) -> SyncResult<PodResponse> {
        self.client.get(uri).await
    }

    /// `PATCH` if the generation is still current
    ///
    /// # Errors
    ///
    /// `SyncError::Superseded` for a stale run, otherwise transport failures.
    pub async fn patch(&self, uri: &str, update: &UpdateRequest) -> SyncResult<PodResponse> {
        self.token.ensure_current()?;
        self.client.patch(uri, update).await
    }

    /// `POST` a container if the generation is still current
    ///
    /// # Errors
    ///
    /// `SyncError::Superseded` for a stale run, otherwise transport failures.
    pub async fn post_container(
        &self,
        parent: &str,
        slug: &str,
        body: &str,
    ) -> SyncResult<PodResponse> {
        self.token.ensure_current()?;
        self.client.post_container(parent, slug, body).await
    }
}

/// Resolve `reference` against `base`
///
/// # Errors
///
/// `SyncError::MalformedDocument` when `base` is not an absolute URL.
pub fn resolve(base: &str, reference: &str) -> SyncResult<String> {
    Url::parse(base)
        .and_then(|url| url.join(reference))
        .map(String::from)
        .map_err(|e| SyncError::MalformedDocument {
            uri: base.to_owned(),
            reason: e.to_string(),
        })
}

/// Document address of an IRI, without its fragment
///
/// # Errors
///
/// `SyncError::MalformedDocument` when `iri` is not an absolute URL.
pub fn document_of(iri: &str) -> SyncResult<String> {
    let mut url = Url::parse(iri).map_err(|e| SyncError::MalformedDocument {
        uri: iri.to_owned(),
        reason: e.to_string(),
    })?;
    url.set_fragment(None);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("https://pod.example/settings/privateTypeIndex.ttl", "/private/health/")
                .unwrap(),
            "https://pod.example/private/health/"
        );
        assert_eq!(
            resolve("https://pod.example/private/health/", "fitness.ttl").unwrap(),
            "https://pod.example/private/health/fitness.ttl"
        );
        assert!(resolve("not a url", "x").is_err());
    }

    #[test]
    fn test_document_of_strips_fragment() {
        assert_eq!(
            document_of("https://alice.pod.example/profile/card#me").unwrap(),
            "https://alice.pod.example/profile/card"
        );
    }

    #[test]
    fn test_success_range() {
        assert!(PodResponse::new(205, "").is_success());
        assert!(!PodResponse::new(409, "exists").is_success());
    }
}
