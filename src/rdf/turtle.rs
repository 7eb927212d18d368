// ABOUTME: Turtle document loader built on oxttl
// ABOUTME: Converts parsed statements into graph terms with document-scoped blank nodes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use oxrdf::{Subject, Term as OxTerm};
use oxttl::TurtleParser;

use super::term::{Literal, Term, Triple};
use solid_health_core::constants::iri;
use solid_health_core::errors::{SyncError, SyncResult};

const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Parse a Turtle document served at `base`
///
/// Relative IRIs resolve against `base`. Blank node labels are prefixed with
/// the document address so two documents using `_:b0` never share a node.
///
/// # Errors
///
/// Returns `SyncError::MalformedDocument` when the body is not valid Turtle.
pub fn parse_turtle(base: &str, body: &str) -> SyncResult<Vec<Triple>> {
    let malformed = |reason: String| SyncError::MalformedDocument {
        uri: base.to_owned(),
        reason,
    };

    let parser = TurtleParser::new()
        .with_base_iri(base)
        .map_err(|e| malformed(e.to_string()))?;

    let mut triples = Vec::new();
    for parsed in parser.for_slice(body.as_bytes()) {
        let triple = parsed.map_err(|e| malformed(e.to_string()))?;
        let Some(subject) = convert_subject(base, triple.subject) else {
            continue;
        };
        let Some(object) = convert_term(base, triple.object) else {
            continue;
        };
        triples.push(Triple::new(subject, triple.predicate.into_string(), object));
    }
    Ok(triples)
}

fn scoped_blank(base: &str, id: &str) -> Term {
    Term::Blank(format!("{base}|{id}"))
}

fn convert_subject(base: &str, subject: Subject) -> Option<Term> {
    match subject {
        Subject::NamedNode(node) => Some(Term::Named(node.into_string())),
        Subject::BlankNode(node) => Some(scoped_blank(base, node.as_str())),
        // quoted triples are not used by any document we read
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn convert_term(base: &str, term: OxTerm) -> Option<Term> {
    match term {
        OxTerm::NamedNode(node) => Some(Term::Named(node.into_string())),
        OxTerm::BlankNode(node) => Some(scoped_blank(base, node.as_str())),
        OxTerm::Literal(literal) => {
            let (value, datatype, language) = literal.destruct();
            let datatype = match (&language, datatype) {
                (_, Some(datatype)) => datatype.into_string(),
                (Some(_), None) => RDF_LANG_STRING.to_owned(),
                (None, None) => iri::XSD_STRING.to_owned(),
            };
            Some(Term::Literal(Literal {
                value,
                datatype,
                language,
            }))
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
