// ABOUTME: RDF terms and triples held by the in-memory graph
// ABOUTME: Named nodes, document-scoped blank nodes and typed literals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Write};

use solid_health_core::constants::iri;

/// Typed literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Lexical form
    pub value: String,
    /// Datatype IRI (`xsd:string` for plain literals)
    pub datatype: String,
    /// Language tag of `rdf:langString` literals
    pub language: Option<String>,
}

impl Literal {
    /// Literal with an explicit datatype
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Plain string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, iri::XSD_STRING)
    }

    /// `xsd:date` literal
    ///
    /// Observation documents store the raw provider date here, including full
    /// timestamps for heart-rate readings.
    pub fn date(value: impl Into<String>) -> Self {
        Self::typed(value, iri::XSD_DATE)
    }

    /// `xsd:integer` literal, rounding fractional input
    #[must_use]
    pub fn integer(value: f64) -> Self {
        Self::typed(format!("{}", value.round() as i64), iri::XSD_INTEGER)
    }

    /// `xsd:decimal` literal
    #[must_use]
    pub fn decimal(value: f64) -> Self {
        Self::typed(format!("{value}"), iri::XSD_DECIMAL)
    }

    /// Integral values become `xsd:integer`, everything else `xsd:decimal`
    #[must_use]
    pub fn number(value: f64) -> Self {
        if value.is_finite() && value.fract().abs() < f64::EPSILON {
            Self::integer(value)
        } else {
            Self::decimal(value)
        }
    }

    /// Whether the datatype is `xsd:integer` or `xsd:decimal`
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.datatype == iri::XSD_INTEGER || self.datatype == iri::XSD_DECIMAL
    }

    /// Numeric value of an integer or decimal literal
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        if !self.is_numeric() {
            return None;
        }
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Turtle / N-Triples spelling
    #[must_use]
    pub fn to_turtle(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + 2);
        out.push('"');
        for c in self.value.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                other => out.push(other),
            }
        }
        out.push('"');
        if let Some(language) = &self.language {
            let _ = write!(out, "@{language}");
        } else if self.datatype != iri::XSD_STRING {
            let _ = write!(out, "^^<{}>", self.datatype);
        }
        out
    }
}

/// Node or value in a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Absolute IRI
    Named(String),
    /// Blank node, labelled uniquely across all loaded documents
    Blank(String),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Named node for an IRI
    pub fn named(iri: impl Into<String>) -> Self {
        Self::Named(iri.into())
    }

    /// IRI of a named node
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Named(iri) => Some(iri),
            _ => None,
        }
    }

    /// Literal payload
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Whether the term can be the subject of further statements
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Self::Named(_) | Self::Blank(_))
    }

    /// Lexical value regardless of term kind
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Named(iri) => iri,
            Self::Blank(id) => id,
            Self::Literal(literal) => &literal.value,
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => write!(f, "<{iri}>"),
            Self::Blank(id) => write!(f, "_:{id}"),
            Self::Literal(literal) => f.write_str(&literal.to_turtle()),
        }
    }
}

/// Subject, predicate, object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Named or blank subject
    pub subject: Term,
    /// Predicate IRI
    pub predicate: String,
    /// Object of any kind
    pub object: Term,
}

impl Triple {
    /// Build a triple
    pub fn new(subject: Term, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_typing() {
        assert_eq!(Literal::number(100.0).datatype, iri::XSD_INTEGER);
        assert_eq!(Literal::number(100.0).value, "100");
        assert_eq!(Literal::number(100.02).datatype, iri::XSD_DECIMAL);
        assert_eq!(Literal::number(100.02).value, "100.02");
    }

    #[test]
    fn test_decimal_never_uses_exponent() {
        assert_eq!(Literal::decimal(1e21).value, "1000000000000000000000");
        assert_eq!(Literal::decimal(0.000_1).value, "0.0001");
    }

    #[test]
    fn test_numeric_value_requires_numeric_datatype() {
        assert_eq!(Literal::typed("12.5", iri::XSD_DECIMAL).as_f64(), Some(12.5));
        assert_eq!(Literal::string("12.5").as_f64(), None);
        assert_eq!(Literal::typed("twelve", iri::XSD_INTEGER).as_f64(), None);
    }

    #[test]
    fn test_literal_escaping() {
        let literal = Literal::string("say \"hi\"\n");
        assert_eq!(literal.to_turtle(), r#""say \"hi\"\n""#);
        assert_eq!(
            Literal::date("2020-03-01").to_turtle(),
            "\"2020-03-01\"^^<http://www.w3.org/2001/XMLSchema#date>"
        );
    }
}
