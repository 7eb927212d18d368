// ABOUTME: Linked-data primitives used by the pod readers and writers
// ABOUTME: Terms, an in-memory triple store, Turtle loading and update bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! RDF handling
//!
//! The engine never needs a query language: it loads documents into a flat
//! [`Graph`] and walks it with the four [`TripleStore`] calls. Writes are
//! typed [`UpdateRequest`]s built from [`TripleBlock`]s.

/// Structured Turtle block builder
pub mod builder;
/// Flat statement list and its query trait
pub mod graph;
/// Terms and triples
pub mod term;
/// Turtle parsing
pub mod turtle;
/// SPARQL-Update request bodies
pub mod update;

pub use builder::{Object, PropertyList, TripleBlock};
pub use graph::{Graph, TripleStore};
pub use term::{Literal, Term, Triple};
pub use turtle::parse_turtle;
pub use update::UpdateRequest;
