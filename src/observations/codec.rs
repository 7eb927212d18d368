// ABOUTME: Encodes provider samples as FHIR RDF observation blocks
// ABOUTME: Deterministic resource identifiers per category and day or instant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use crate::rdf::{Literal, PropertyList, Term, TripleBlock};
use solid_health_core::constants::{fhir, iri, loinc, ns, ucum};
use solid_health_core::models::{DataPoint, MetricCategory, PodDataPoint, QuantityType};

/// One encoded observation ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedObservation {
    /// Absolute IRI of the new resource
    pub uri: String,
    /// Observation statements
    pub block: TripleBlock,
    /// `<document> dcterms:references <uri>`
    pub reference: TripleBlock,
    /// Snapshot entry for the encoded sample
    pub point: PodDataPoint,
}

impl EncodedObservation {
    /// Both blocks in upload order
    #[must_use]
    pub fn into_blocks(self) -> [TripleBlock; 2] {
        [self.block, self.reference]
    }
}

/// Fragment identifying a sample inside the observation document
///
/// Daily categories key on the UTC calendar day, so a document holds at most
/// one record per category and day. Heart rate keys on the epoch millisecond.
#[must_use]
pub fn observation_id(category: MetricCategory, at: DateTime<Utc>) -> String {
    if category.is_daily() {
        format!("{}_{}", category.id_prefix(), at.format("%Y%m%d"))
    } else {
        format!("{}_{}", category.id_prefix(), at.timestamp_millis())
    }
}

/// Encodes samples for one patient and one document
#[derive(Debug, Clone)]
pub struct ObservationCodec {
    web_id: String,
    document: String,
}

impl ObservationCodec {
    /// Codec writing observations about `web_id` into `document`
    pub fn new(web_id: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            web_id: web_id.into(),
            document: document.into(),
        }
    }

    /// Observation document address
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Encode one sample
    ///
    /// Returns `None` when the sample date cannot be interpreted; such a
    /// sample has no stable identifier and is never uploaded.
    #[must_use]
    pub fn encode(&self, point: &DataPoint, category: MetricCategory) -> Option<EncodedObservation> {
        let at = point.parsed_date()?;
        let uri = format!("{}#{}", self.document, observation_id(category, at));

        // fractional counts keep their fraction so they read back unchanged
        let value = match category.quantity_type() {
            QuantityType::Integer => Literal::number(point.value),
            QuantityType::Decimal => Literal::decimal(point.value),
        };

        let block = TripleBlock::new(Term::named(uri.clone()))
            .add(iri::RDF_TYPE, Term::named(fhir::OBSERVATION))
            .add(fhir::NODE_ROLE, Term::named(fhir::TREE_ROOT))
            .add(fhir::OBSERVATION_STATUS, value_node(Literal::string(fhir::STATUS_FINAL)))
            .add(fhir::OBSERVATION_CODE, code_node(category))
            .add(
                fhir::OBSERVATION_SUBJECT,
                PropertyList::new().add(fhir::LINK, Term::named(self.web_id.clone())),
            )
            .add(
                fhir::OBSERVATION_EFFECTIVE_DATE_TIME,
                value_node(Literal::date(point.date.clone())),
            )
            .add(
                fhir::OBSERVATION_VALUE_QUANTITY,
                PropertyList::new()
                    .add(fhir::QUANTITY_VALUE, value_node(value))
                    .add(fhir::QUANTITY_UNIT, value_node(Literal::string(category.unit())))
                    .add(fhir::QUANTITY_SYSTEM, value_node(Literal::string(ucum::SYSTEM)))
                    .add(
                        fhir::QUANTITY_CODE,
                        value_node(Literal::string(category.unit_code())),
                    ),
            );

        let reference = TripleBlock::new(Term::named(self.document.clone()))
            .add(iri::DCTERMS_REFERENCES, Term::named(uri.clone()));

        Some(EncodedObservation {
            point: PodDataPoint {
                date: point.date.clone(),
                value: point.value,
                uri: uri.clone(),
                parsed_date: at,
            },
            uri,
            block,
            reference,
        })
    }

    /// Statements that turn an absent document into an empty observation file
    #[must_use]
    pub fn document_boilerplate(&self) -> Vec<TripleBlock> {
        vec![
            TripleBlock::new(Term::named(self.web_id.clone()))
                .add(iri::RDF_TYPE, Term::named(fhir::PATIENT)),
            TripleBlock::new(Term::named(self.document.clone()))
                .add(iri::RDF_TYPE, Term::named(iri::OWL_ONTOLOGY))
                .add(iri::OWL_IMPORTS, Term::named(iri::FHIR_ONTOLOGY)),
        ]
    }
}

/// FHIR primitive wrapper `[ fhir:value <literal> ]`
fn value_node(literal: Literal) -> PropertyList {
    PropertyList::new().add(fhir::VALUE, literal)
}

fn code_node(category: MetricCategory) -> PropertyList {
    let code = category.loinc_code();
    let coding = PropertyList::new()
        .add(fhir::INDEX, Literal::integer(0.0))
        .add(iri::RDF_TYPE, Term::named(format!("{}{code}", ns::LOINC_RDF)))
        .add(fhir::CODING_SYSTEM, value_node(Literal::string(loinc::SYSTEM)))
        .add(fhir::CODING_CODE, value_node(Literal::string(code)))
        .add(fhir::CODING_DISPLAY, value_node(Literal::string(category.display())));

    PropertyList::new()
        .add(fhir::CODEABLE_CONCEPT_CODING, coding)
        .add(
            fhir::CODEABLE_CONCEPT_TEXT,
            value_node(Literal::string(category.display())),
        )
}
