// ABOUTME: reqwest implementation of the pod client with bearer authentication
// ABOUTME: Maps transport failures and timeouts onto retryable network errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LINK};
use reqwest::{Client, RequestBuilder};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use super::{PodClient, PodResponse};
use crate::logging::SyncLogger;
use crate::rdf::UpdateRequest;
use solid_health_core::constants::{iri, pod};
use solid_health_core::errors::{SyncError, SyncResult};

/// Pod client over HTTP
#[derive(Clone)]
pub struct HttpPodClient {
    client: Client,
    access_token: Option<String>,
}

impl HttpPodClient {
    /// Unauthenticated client, useful against public documents
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            access_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        method: &'static str,
        uri: &str,
        request: RequestBuilder,
    ) -> SyncResult<PodResponse> {
        let started = Instant::now();
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!("Pod request to {uri} failed: {e}");
            SyncError::network(uri, e.to_string(), e.is_timeout() || e.is_connect())
        })?;

        let status = response.status().as_u16();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        SyncLogger::log_pod_request(method, uri, status, elapsed_ms);

        // a truncated body must never pass for an empty document
        let body = response.text().await.map_err(|e| {
            warn!("Reading pod response body from {uri} failed: {e}");
            SyncError::network(uri, e.to_string(), e.is_timeout())
        })?;
        Ok(PodResponse::new(status, body))
    }
}

#[async_trait]
impl PodClient for HttpPodClient {
    #[instrument(skip(self), fields(method = "GET"))]
    async fn get(&self, uri: &str) -> SyncResult<PodResponse> {
        let request = self.client.get(uri).header(ACCEPT, pod::TEXT_TURTLE);
        self.send("GET", uri, request).await
    }

    #[instrument(skip(self, update), fields(method = "PATCH"))]
    async fn patch(&self, uri: &str, update: &UpdateRequest) -> SyncResult<PodResponse> {
        let body = update.to_string();
        debug!("PATCH body length: {} bytes", body.len());
        let request = self
            .client
            .patch(uri)
            .header(CONTENT_TYPE, pod::SPARQL_UPDATE)
            .body(body);
        self.send("PATCH", uri, request).await
    }

    #[instrument(skip(self, body), fields(method = "POST"))]
    async fn post_container(
        &self,
        parent: &str,
        slug: &str,
        body: &str,
    ) -> SyncResult<PodResponse> {
        let request = self
            .client
            .post(parent)
            .header(CONTENT_TYPE, pod::TEXT_TURTLE)
            .header(LINK, format!("<{}>; rel=\"type\"", iri::LDP_BASIC_CONTAINER))
            .header("Slug", slug)
            .body(body.to_owned());
        self.send("POST", parent, request).await
    }
}
