// ABOUTME: Reads FHIR RDF observations of the active patient out of a graph
// ABOUTME: Shape violations and foreign records are skipped and counted, never raised
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::debug;

use super::ObservationSet;
use crate::rdf::{Term, TripleStore};
use solid_health_core::constants::{fhir, iri, loinc};
use solid_health_core::models::{parse_point_date, MetricCategory, PodDataPoint};

/// Collect every well-formed observation about `web_id`
///
/// An observation is kept only when all of these hold:
/// - its subject links to `web_id`
/// - its effective date is an `xsd:date` literal with a readable date
/// - its quantity value is an `xsd:integer` or `xsd:decimal` literal
/// - its coding is LOINC with a known code
///
/// Everything else shares the document legitimately (other patients, other
/// applications, partial writes) and is only counted in `skipped`.
///
/// A resource written more than once carries several date, quantity or
/// coding nodes. It is read once, from the nodes first stated in the
/// document, and later copies are ignored.
pub fn parse_observations(store: &impl TripleStore, web_id: &str) -> ObservationSet {
    let mut set = ObservationSet::default();
    let observation = Term::named(fhir::OBSERVATION);

    for resource in store.subjects_with(iri::RDF_TYPE, &observation) {
        match parse_one(store, resource, web_id) {
            Some((category, point)) => set.push(category, point),
            None => set.skipped += 1,
        }
    }

    debug!(
        "Parsed {} steps, {} distance, {} heart-rate observations ({} skipped)",
        set.steps.len(),
        set.distance.len(),
        set.heart_rate.len(),
        set.skipped
    );
    set
}

fn parse_one(
    store: &impl TripleStore,
    resource: &Term,
    web_id: &str,
) -> Option<(MetricCategory, PodDataPoint)> {
    let uri = resource.as_iri()?;

    let patient = path(store, resource, &[fhir::OBSERVATION_SUBJECT, fhir::LINK])?;
    if patient.as_iri() != Some(web_id) {
        return None;
    }

    let date = path(store, resource, &[fhir::OBSERVATION_EFFECTIVE_DATE_TIME, fhir::VALUE])?
        .as_literal()
        .filter(|literal| literal.datatype == iri::XSD_DATE)?;
    let parsed_date = parse_point_date(&date.value)?;

    let value = path(
        store,
        resource,
        &[fhir::OBSERVATION_VALUE_QUANTITY, fhir::QUANTITY_VALUE, fhir::VALUE],
    )?
    .as_literal()?
    .as_f64()?;

    let category = category_of(store, resource)?;

    Some((
        category,
        PodDataPoint {
            date: date.value.clone(),
            value,
            uri: uri.to_owned(),
            parsed_date,
        },
    ))
}

/// Follow single-valued predicates from `start`
fn path<'s>(store: &'s impl TripleStore, start: &'s Term, predicates: &[&str]) -> Option<&'s Term> {
    predicates
        .iter()
        .try_fold(start, |node, predicate| store.query_single(node, predicate))
}

fn category_of(store: &impl TripleStore, resource: &Term) -> Option<MetricCategory> {
    let coding = path(
        store,
        resource,
        &[fhir::OBSERVATION_CODE, fhir::CODEABLE_CONCEPT_CODING],
    )?;
    let system = path(store, coding, &[fhir::CODING_SYSTEM, fhir::VALUE])?;
    let code = path(store, coding, &[fhir::CODING_CODE, fhir::VALUE])?;
    if system.value() != loinc::SYSTEM {
        return None;
    }
    MetricCategory::from_loinc_code(code.value())
}
