// ABOUTME: Structured builder for Turtle triple blocks with nested blank nodes
// ABOUTME: Serializes blocks for SPARQL-Update bodies and expands them into triples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Triple blocks are built as data, never as string templates. A block is one
//! subject with a property list; objects are either terms or nested
//! anonymous nodes (`[ ... ]`).
//!
//! ```rust
//! use solid_health_sync::rdf::{Literal, PropertyList, Term, TripleBlock};
//!
//! let block = TripleBlock::new(Term::named("https://pod.example/doc#steps_20200301"))
//!     .add("http://hl7.org/fhir/Observation.status",
//!          PropertyList::new().add("http://hl7.org/fhir/value", Literal::string("final")));
//! assert!(block.to_turtle().ends_with(" .\n"));
//! ```

use std::fmt::Write;

use super::term::{Literal, Term, Triple};

/// Object position of a property
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Plain term
    Term(Term),
    /// Anonymous node with its own properties
    Nested(PropertyList),
}

impl From<Term> for Object {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Self::Term(Term::Literal(literal))
    }
}

impl From<PropertyList> for Object {
    fn from(list: PropertyList) -> Self {
        Self::Nested(list)
    }
}

/// Ordered predicate/object pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyList {
    properties: Vec<(String, Object)>,
}

impl PropertyList {
    /// Empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property
    #[must_use]
    pub fn add(mut self, predicate: impl Into<String>, object: impl Into<Object>) -> Self {
        self.properties.push((predicate.into(), object.into()));
        self
    }

    /// Properties in insertion order
    #[must_use]
    pub fn properties(&self) -> &[(String, Object)] {
        &self.properties
    }

    fn write_turtle(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth + 1);
        for (i, (predicate, object)) in self.properties.iter().enumerate() {
            if i > 0 {
                out.push_str(" ;\n");
            }
            let _ = write!(out, "{indent}<{predicate}> ");
            match object {
                Object::Term(term) => {
                    let _ = write!(out, "{term}");
                }
                Object::Nested(list) => {
                    out.push_str("[\n");
                    list.write_turtle(out, depth + 1);
                    let _ = write!(out, "\n{indent}]");
                }
            }
        }
    }

    fn expand(&self, subject: &Term, blanks: &mut dyn FnMut() -> Term, out: &mut Vec<Triple>) {
        for (predicate, object) in &self.properties {
            match object {
                Object::Term(term) => {
                    out.push(Triple::new(subject.clone(), predicate.clone(), term.clone()));
                }
                Object::Nested(list) => {
                    let node = blanks();
                    out.push(Triple::new(subject.clone(), predicate.clone(), node.clone()));
                    list.expand(&node, blanks, out);
                }
            }
        }
    }
}

/// One subject and its properties
#[derive(Debug, Clone, PartialEq)]
pub struct TripleBlock {
    subject: Term,
    properties: PropertyList,
}

impl TripleBlock {
    /// Block about `subject`
    #[must_use]
    pub fn new(subject: Term) -> Self {
        Self {
            subject,
            properties: PropertyList::new(),
        }
    }

    /// Append a property
    #[must_use]
    pub fn add(mut self, predicate: impl Into<String>, object: impl Into<Object>) -> Self {
        self.properties = self.properties.add(predicate, object);
        self
    }

    /// Subject of the block
    #[must_use]
    pub const fn subject(&self) -> &Term {
        &self.subject
    }

    /// Top-level properties
    #[must_use]
    pub const fn properties(&self) -> &PropertyList {
        &self.properties
    }

    /// Turtle statement terminated by ` .`
    #[must_use]
    pub fn to_turtle(&self) -> String {
        let mut out = format!("{}\n", self.subject);
        self.properties.write_turtle(&mut out, 0);
        out.push_str(" .\n");
        out
    }

    /// Flatten into triples, minting nested nodes with `blanks`
    pub fn to_triples(&self, blanks: &mut dyn FnMut() -> Term) -> Vec<Triple> {
        let mut out = Vec::new();
        self.properties.expand(&self.subject, blanks, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::turtle::parse_turtle;

    fn block() -> TripleBlock {
        TripleBlock::new(Term::named("https://pod.example/doc#a"))
            .add(
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                Term::named("http://hl7.org/fhir/Observation"),
            )
            .add(
                "http://hl7.org/fhir/Observation.valueQuantity",
                PropertyList::new().add(
                    "http://hl7.org/fhir/Quantity.value",
                    PropertyList::new()
                        .add("http://hl7.org/fhir/value", Literal::integer(4200.0)),
                ),
            )
    }

    #[test]
    fn test_turtle_nesting() {
        let turtle = block().to_turtle();
        assert!(turtle.starts_with("<https://pod.example/doc#a>\n"));
        assert!(turtle.contains("<http://hl7.org/fhir/Quantity.value> [\n"));
        assert!(turtle.contains(
            "\"4200\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        ));
        assert_eq!(turtle.matches('[').count(), turtle.matches(']').count());
        assert!(turtle.ends_with(" .\n"));
    }

    #[test]
    fn test_turtle_round_trips_through_parser() {
        let turtle = block().to_turtle();
        let triples = parse_turtle("https://pod.example/doc", &turtle).unwrap();
        assert_eq!(triples.len(), 4);
    }

    #[test]
    fn test_to_triples_mints_one_node_per_nesting() {
        let mut n = 0;
        let mut mint = || {
            n += 1;
            Term::Blank(format!("n{n}"))
        };
        let triples = block().to_triples(&mut mint);
        assert_eq!(triples.len(), 4);
        assert_eq!(triples[1].object, Term::Blank("n1".to_owned()));
        assert_eq!(triples[2].subject, Term::Blank("n1".to_owned()));
        assert_eq!(triples[3].subject, Term::Blank("n2".to_owned()));
    }
}
