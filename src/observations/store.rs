// ABOUTME: Loads the observation document, creating it on first use
// ABOUTME: An absent document is initialised with patient and ontology boilerplate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::codec::ObservationCodec;
use super::parser::parse_observations;
use super::ObservationSet;
use crate::pod::{Fetcher, GuardedPod};
use crate::rdf::{Graph, UpdateRequest};
use solid_health_core::errors::{SyncError, SyncResult};

/// Observation document of one patient
pub struct ObservationStore<'a> {
    pod: &'a GuardedPod,
    codec: ObservationCodec,
    web_id: String,
}

impl<'a> ObservationStore<'a> {
    /// Store for `web_id`'s observations in `document`
    pub fn new(pod: &'a GuardedPod, web_id: impl Into<String>, document: impl Into<String>) -> Self {
        let web_id = web_id.into();
        Self {
            pod,
            codec: ObservationCodec::new(web_id.clone(), document),
            web_id,
        }
    }

    /// Codec writing into this document
    #[must_use]
    pub const fn codec(&self) -> &ObservationCodec {
        &self.codec
    }

    /// Load and parse every observation of the patient
    ///
    /// A document that cannot be fetched is treated as absent: it is
    /// initialised with boilerplate and an empty set is returned.
    ///
    /// # Errors
    ///
    /// - `SyncError::RemoteRejection` when the initialising PATCH is refused
    /// - `SyncError::MalformedDocument` when the existing document is not Turtle
    /// - transport failures
    #[instrument(skip(self), fields(document = %self.codec.document()))]
    pub async fn load(&self) -> SyncResult<ObservationSet> {
        let document = self.codec.document();
        let mut graph = Graph::new();

        if Fetcher::new(self.pod).try_load(&mut graph, document).await? {
            return Ok(parse_observations(&graph, &self.web_id));
        }

        let update = UpdateRequest::insert(self.codec.document_boilerplate());
        let response = self.pod.patch(document, &update).await?;
        if !response.is_success() {
            return Err(SyncError::RemoteRejection {
                method: "PATCH",
                uri: document.to_owned(),
                status: response.status,
                body: response.body,
            });
        }

        info!("Populated {document}");
        Ok(ObservationSet::default())
    }
}
