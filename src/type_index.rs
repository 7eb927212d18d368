// ABOUTME: Locates the observation document through the private type index
// ABOUTME: Bootstraps a registration and container when none exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Type index resolution
//!
//! A registration for `fhir:Observation` points either at a single document
//! (`solid:instance`) or at a container (`solid:instanceContainer`) whose
//! default file holds the observations. Without any registration the resolver
//! writes one, creates the container and points into it; a second resolve then
//! finds that registration and writes nothing.

use tracing::{info, instrument, warn};
use url::Url;

use crate::pod::{document_of, resolve, Fetcher, GuardedPod};
use crate::rdf::{Graph, Literal, Term, TripleBlock, TripleStore, UpdateRequest};
use solid_health_core::constants::{fhir, iri, pod};
use solid_health_core::errors::{SyncError, SyncResult};

/// HTTP status a pod answers when the container already exists
const CONFLICT: u16 = 409;

/// Where new observation data is placed on bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodLayout {
    /// Container path relative to the pod root, with trailing slash
    pub container_path: String,
    /// Observation document name inside a container
    pub observation_file: String,
}

impl Default for PodLayout {
    fn default() -> Self {
        Self {
            container_path: pod::DEFAULT_CONTAINER_PATH.to_owned(),
            observation_file: pod::DEFAULT_OBSERVATION_FILE.to_owned(),
        }
    }
}

/// Where the registration points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationLocation {
    /// `solid:instance`
    Instance(String),
    /// `solid:instanceContainer`
    Container(String),
}

/// Resolves and bootstraps the observation document location
pub struct TypeIndexResolver<'a> {
    pod: &'a GuardedPod,
    layout: PodLayout,
}

impl<'a> TypeIndexResolver<'a> {
    /// Resolver with the given bootstrap layout
    #[must_use]
    pub const fn new(pod: &'a GuardedPod, layout: PodLayout) -> Self {
        Self { pod, layout }
    }

    /// Absolute URI of the observation document
    ///
    /// # Errors
    ///
    /// - `SyncError::Network` when the type index cannot be fetched
    /// - `SyncError::BootstrapFailure` when the registration insert or the
    ///   container creation is rejected
    /// - `SyncError::Superseded` when the run went stale before a write
    #[instrument(skip(self))]
    pub async fn resolve(&self, type_index: &str) -> SyncResult<String> {
        let mut graph = Graph::new();
        Fetcher::new(self.pod).load(&mut graph, type_index).await?;

        match find_registration(&graph) {
            Some(ObservationLocation::Instance(uri)) => {
                info!("Observation registration points at instance {uri}");
                Ok(uri)
            }
            Some(ObservationLocation::Container(container)) => {
                info!("Observation registration points at container {container}");
                resolve(&container, &self.layout.observation_file)
            }
            None => self.bootstrap(type_index).await,
        }
    }

    async fn bootstrap(&self, type_index: &str) -> SyncResult<String> {
        warn!("No observation registration in type index, creating one");

        let index_document = document_of(type_index)?;
        let container = resolve(&index_document, &self.layout.container_path)?;

        let response = self
            .pod
            .patch(
                &index_document,
                &registration_update(&index_document, &container),
            )
            .await?;
        if !response.is_success() {
            return Err(SyncError::BootstrapFailure {
                step: "type registration insert",
                status: response.status,
                body: response.body,
            });
        }
        info!("Added observation registration to {index_document}");

        let (parent, slug) = container_parent_and_slug(&container)?;
        let body = TripleBlock::new(Term::named(""))
            .add(iri::DCTERMS_TITLE, Literal::string(pod::CONTAINER_TITLE))
            .to_turtle();
        let response = self.pod.post_container(&parent, &slug, &body).await?;
        if response.is_success() || response.status == CONFLICT {
            info!("Container {container} ready (status {})", response.status);
        } else {
            return Err(SyncError::BootstrapFailure {
                step: "container creation",
                status: response.status,
                body: response.body,
            });
        }

        resolve(&container, &self.layout.observation_file)
    }
}

/// First usable `fhir:Observation` registration in the graph
///
/// An instance wins over a container on the same registration; registrations
/// declaring neither are skipped.
pub fn find_registration(store: &impl TripleStore) -> Option<ObservationLocation> {
    let observation = Term::named(fhir::OBSERVATION);
    store
        .subjects_with(iri::SOLID_FOR_CLASS, &observation)
        .into_iter()
        .find_map(|registration| {
            let iri_of = |predicate| {
                store
                    .query_single(registration, predicate)
                    .and_then(Term::as_iri)
                    .map(str::to_owned)
            };
            iri_of(iri::SOLID_INSTANCE)
                .map(ObservationLocation::Instance)
                .or_else(|| iri_of(iri::SOLID_INSTANCE_CONTAINER).map(ObservationLocation::Container))
        })
}

/// Registration statements inserted on bootstrap
fn registration_update(index_document: &str, container: &str) -> UpdateRequest {
    let registration = format!("{index_document}{}", pod::REGISTRATION_FRAGMENT);
    UpdateRequest::insert(vec![
        TripleBlock::new(Term::named(registration.clone()))
            .add(iri::RDF_TYPE, Term::named(iri::SOLID_TYPE_REGISTRATION))
            .add(iri::SOLID_FOR_CLASS, Term::named(fhir::OBSERVATION))
            .add(iri::SOLID_INSTANCE_CONTAINER, Term::named(container)),
        TripleBlock::new(Term::named(index_document))
            .add(iri::DCTERMS_REFERENCES, Term::named(registration)),
    ])
}

/// Parent container and last path segment of a container URI
fn container_parent_and_slug(container: &str) -> SyncResult<(String, String)> {
    let malformed = |reason: &str| SyncError::MalformedDocument {
        uri: container.to_owned(),
        reason: reason.to_owned(),
    };
    let url = Url::parse(container).map_err(|e| malformed(&e.to_string()))?;
    let slug = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_owned)
        .ok_or_else(|| malformed("container path has no segments"))?;
    let parent = url
        .join("..")
        .map_err(|e| malformed(&e.to_string()))?
        .to_string();
    Ok((parent, slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::parse_turtle;

    const INDEX: &str = "https://pod.example/settings/privateTypeIndex.ttl";

    fn graph(body: &str) -> Graph {
        let mut graph = Graph::new();
        graph.extend(parse_turtle(INDEX, body).unwrap());
        graph
    }

    #[test]
    fn test_instance_wins_over_container() {
        let graph = graph(
            r#"
            @prefix solid: <http://www.w3.org/ns/solid/terms#> .
            <#obs> solid:forClass <http://hl7.org/fhir/Observation> ;
                solid:instanceContainer </health/> ;
                solid:instance </health/mine.ttl> .
        "#,
        );
        assert_eq!(
            find_registration(&graph),
            Some(ObservationLocation::Instance(
                "https://pod.example/health/mine.ttl".to_owned()
            ))
        );
    }

    #[test]
    fn test_registration_for_other_class_is_ignored() {
        let graph = graph(
            r#"
            @prefix solid: <http://www.w3.org/ns/solid/terms#> .
            <#notes> solid:forClass <http://schema.org/TextDigitalDocument> ;
                solid:instanceContainer </notes/> .
        "#,
        );
        assert_eq!(find_registration(&graph), None);
    }

    #[test]
    fn test_container_parent_and_slug() {
        let (parent, slug) =
            container_parent_and_slug("https://pod.example/private/health/").unwrap();
        assert_eq!(parent, "https://pod.example/private/");
        assert_eq!(slug, "health");
    }

    #[test]
    fn test_registration_update_body() {
        let body = registration_update(INDEX, "https://pod.example/private/health/").to_string();
        assert!(body.contains(
            "<https://pod.example/settings/privateTypeIndex.ttl#FHIRObservation>"
        ));
        assert!(body.contains("<http://www.w3.org/ns/solid/terms#instanceContainer> <https://pod.example/private/health/>"));
        assert!(body.contains("<http://purl.org/dc/terms/references>"));
    }
}
