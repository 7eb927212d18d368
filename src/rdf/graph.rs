// ABOUTME: In-memory triple store indexed by subject and by object
// ABOUTME: Single and multi-valued lookups plus reverse subject search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::fmt::Write;
use std::mem;

use super::term::{Term, Triple};

/// Query surface the profile, type-index and observation readers need
///
/// Anything that can answer these four calls can back the engine; the crate
/// ships [`Graph`], an indexed statement list.
pub trait TripleStore {
    /// Assert a statement; asserting one already present changes nothing
    fn add_statement(&mut self, triple: Triple);

    /// First object of `(subject, predicate, ?)` in insertion order
    fn query_single(&self, subject: &Term, predicate: &str) -> Option<&Term>;

    /// Every object of `(subject, predicate, ?)`, in insertion order
    fn query_all(&self, subject: &Term, predicate: &str) -> Vec<&Term>;

    /// Every subject of `(?, predicate, object)`, in insertion order
    fn subjects_with(&self, predicate: &str, object: &Term) -> Vec<&Term>;
}

/// Statement positions keyed by one node and then a predicate
type Index = HashMap<Term, HashMap<String, Vec<usize>>>;

/// In-memory graph
///
/// Statements are kept in insertion order. Two indexes map
/// `(subject, predicate)` and `(object, predicate)` to statement positions,
/// so each lookup is a hash probe rather than a scan.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    outgoing: Index,
    incoming: Index,
}

fn positions<'i>(index: &'i Index, node: &Term, predicate: &str) -> &'i [usize] {
    index
        .get(node)
        .and_then(|by_predicate| by_predicate.get(predicate))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn record(index: &mut Index, node: &Term, predicate: &str, position: usize) {
    let slots = index
        .entry(node.clone())
        .or_default()
        .entry(predicate.to_owned())
        .or_default();
    // sorted, so lookups answer in insertion order
    if let Err(at) = slots.binary_search(&position) {
        slots.insert(at, position);
    }
}

fn forget(index: &mut Index, node: &Term, predicate: &str, position: usize) {
    if let Some(slots) = index
        .get_mut(node)
        .and_then(|by_predicate| by_predicate.get_mut(predicate))
    {
        slots.retain(|&p| p != position);
    }
}

impl Graph {
    /// Empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph holds no statements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All statements
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Replace the object of every `(subject, predicate, ?)` statement
    ///
    /// Returns how many statements were rewritten.
    pub fn set_objects(&mut self, subject: &Term, predicate: &str, object: &Term) -> usize {
        let targets = positions(&self.outgoing, subject, predicate).to_vec();
        for &position in &targets {
            let Some(triple) = self.triples.get_mut(position) else {
                continue;
            };
            let previous = mem::replace(&mut triple.object, object.clone());
            forget(&mut self.incoming, &previous, predicate, position);
            record(&mut self.incoming, object, predicate, position);
        }
        targets.len()
    }

    /// Serialize as N-Triples, which is also valid Turtle
    ///
    /// Blank node labels are renumbered so document-scoped labels never leak.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        let mut labels: HashMap<&str, usize> = HashMap::new();
        let mut out = String::new();
        for triple in &self.triples {
            let subject = Self::write_term(&triple.subject, &mut labels);
            let object = Self::write_term(&triple.object, &mut labels);
            let _ = writeln!(out, "{subject} <{}> {object} .", triple.predicate);
        }
        out
    }

    fn write_term<'a>(term: &'a Term, labels: &mut HashMap<&'a str, usize>) -> String {
        match term {
            Term::Blank(id) => {
                let next = labels.len();
                let n = *labels.entry(id.as_str()).or_insert(next);
                format!("_:b{n}")
            }
            other => other.to_string(),
        }
    }

    fn at<'g>(&'g self, positions: &'g [usize]) -> impl Iterator<Item = &'g Triple> + 'g {
        positions
            .iter()
            .filter_map(|&position| self.triples.get(position))
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.add_statement(triple);
        }
    }
}

impl TripleStore for Graph {
    fn add_statement(&mut self, triple: Triple) {
        let present = self
            .at(positions(&self.outgoing, &triple.subject, &triple.predicate))
            .any(|t| t.object == triple.object);
        if present {
            return;
        }
        let position = self.triples.len();
        record(&mut self.outgoing, &triple.subject, &triple.predicate, position);
        record(&mut self.incoming, &triple.object, &triple.predicate, position);
        self.triples.push(triple);
    }

    fn query_single(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.at(positions(&self.outgoing, subject, predicate))
            .next()
            .map(|t| &t.object)
    }

    fn query_all(&self, subject: &Term, predicate: &str) -> Vec<&Term> {
        self.at(positions(&self.outgoing, subject, predicate))
            .map(|t| &t.object)
            .collect()
    }

    fn subjects_with(&self, predicate: &str, object: &Term) -> Vec<&Term> {
        self.at(positions(&self.incoming, object, predicate))
            .map(|t| &t.subject)
            .collect()
    }
}
