// ABOUTME: Loads pod documents into the in-memory graph
// ABOUTME: Distinguishes absent documents from unreachable ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{debug, info};

use super::{document_of, GuardedPod};
use crate::rdf::{parse_turtle, Graph};
use solid_health_core::errors::{SyncError, SyncResult};

/// Fetches documents and asserts their statements into a graph
pub struct Fetcher<'a> {
    pod: &'a GuardedPod,
}

impl<'a> Fetcher<'a> {
    /// Fetcher reading through `pod`
    #[must_use]
    pub const fn new(pod: &'a GuardedPod) -> Self {
        Self { pod }
    }

    /// Load the document holding `uri`, reporting whether it exists
    ///
    /// Any non-success status counts as "not there" and returns `Ok(false)`
    /// without touching the graph.
    ///
    /// # Errors
    ///
    /// Transport failures and unparseable bodies.
    pub async fn try_load(&self, graph: &mut Graph, uri: &str) -> SyncResult<bool> {
        let document = document_of(uri)?;
        let response = self.pod.get(&document).await?;
        if !response.is_success() {
            debug!(
                "Document {document} not available (status {})",
                response.status
            );
            return Ok(false);
        }

        let triples = parse_turtle(&document, &response.body)?;
        info!("Loaded {} statements from {document}", triples.len());
        graph.extend(triples);
        Ok(true)
    }

    /// Load the document holding `uri`, which must exist
    ///
    /// # Errors
    ///
    /// `SyncError::Network` when the document is unreachable or answered with
    /// a non-success status, plus everything `try_load` returns.
    pub async fn load(&self, graph: &mut Graph, uri: &str) -> SyncResult<()> {
        let document = document_of(uri)?;
        let response = self.pod.get(&document).await?;
        if !response.is_success() {
            return Err(SyncError::network(
                document,
                format!("GET returned status {}", response.status),
                response.status >= 500,
            ));
        }

        let triples = parse_turtle(&document, &response.body)?;
        info!("Loaded {} statements from {document}", triples.len());
        graph.extend(triples);
        Ok(())
    }
}
