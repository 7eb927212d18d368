// ABOUTME: Typed SPARQL-Update requests sent as pod PATCH bodies
// ABOUTME: INSERT DATA over triple blocks and the quantity value replacement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use super::builder::TripleBlock;
use super::term::Literal;
use solid_health_core::constants::fhir;

/// Body of a `PATCH` with content type `application/sparql-update`
///
/// Requests stay typed until they reach the transport so test doubles can
/// apply them without parsing SPARQL.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRequest {
    /// `INSERT DATA { ... }`
    InsertData {
        /// Blocks to insert, in order
        blocks: Vec<TripleBlock>,
    },
    /// `DELETE { ?s fhir:value ?o } INSERT { ?s fhir:value v } WHERE { ... }`
    ///
    /// Rewrites the `Quantity.value` of one observation in place.
    ReplaceQuantityValue {
        /// Absolute IRI of the observation
        resource: String,
        /// New value literal
        value: Literal,
    },
}

impl UpdateRequest {
    /// Insert the given blocks
    #[must_use]
    pub fn insert(blocks: Vec<TripleBlock>) -> Self {
        Self::InsertData { blocks }
    }

    /// Replace an observation value, typed integer or decimal by its magnitude
    pub fn replace_value(resource: impl Into<String>, value: f64) -> Self {
        Self::ReplaceQuantityValue {
            resource: resource.into(),
            value: Literal::number(value),
        }
    }
}

impl fmt::Display for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertData { blocks } => {
                writeln!(f, "INSERT DATA {{")?;
                for block in blocks {
                    f.write_str(&block.to_turtle())?;
                }
                write!(f, "}}")
            }
            Self::ReplaceQuantityValue { resource, value } => {
                let value_predicate = fhir::VALUE;
                writeln!(f, "DELETE {{")?;
                writeln!(f, "  ?s <{value_predicate}> ?o")?;
                writeln!(f, "}} INSERT {{")?;
                writeln!(f, "  ?s <{value_predicate}> {}", value.to_turtle())?;
                writeln!(f, "}} WHERE {{")?;
                writeln!(
                    f,
                    "  <{resource}> <{}> [ <{}> ?s ] .",
                    fhir::OBSERVATION_VALUE_QUANTITY,
                    fhir::QUANTITY_VALUE
                )?;
                writeln!(f, "  ?s <{value_predicate}> ?o")?;
                write!(f, "}}")
            }
        }
    }
}
