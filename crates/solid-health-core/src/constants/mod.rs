// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Vocabulary IRIs, LOINC clinical codes, units and sync engine defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Groups the linked-data vocabulary, clinical codes and engine defaults by
//! domain so the codec and the parser agree on every IRI.

/// RDF namespaces that identifiers are minted in
pub mod ns {
    /// LOINC RDF class namespace
    pub const LOINC_RDF: &str = "http://loinc.org/rdf#";
}

/// Fully expanded IRIs that appear in more than one module
pub mod iri {
    /// `rdf:type`
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `foaf:name`
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    /// `foaf:img`
    pub const FOAF_IMG: &str = "http://xmlns.com/foaf/0.1/img";
    /// `foaf:knows`
    pub const FOAF_KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
    /// `solid:privateTypeIndex`
    pub const SOLID_PRIVATE_TYPE_INDEX: &str = "http://www.w3.org/ns/solid/terms#privateTypeIndex";
    /// `solid:TypeRegistration`
    pub const SOLID_TYPE_REGISTRATION: &str = "http://www.w3.org/ns/solid/terms#TypeRegistration";
    /// `solid:forClass`
    pub const SOLID_FOR_CLASS: &str = "http://www.w3.org/ns/solid/terms#forClass";
    /// `solid:instance`
    pub const SOLID_INSTANCE: &str = "http://www.w3.org/ns/solid/terms#instance";
    /// `solid:instanceContainer`
    pub const SOLID_INSTANCE_CONTAINER: &str = "http://www.w3.org/ns/solid/terms#instanceContainer";
    /// `dcterms:references`
    pub const DCTERMS_REFERENCES: &str = "http://purl.org/dc/terms/references";
    /// `dcterms:title`
    pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
    /// `owl:Ontology`
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:imports`
    pub const OWL_IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";
    /// `ldp:BasicContainer`
    pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    /// `xsd:date`
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// `xsd:decimal`
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:integer`
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:string`
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// The FHIR ontology document imported by observation files
    pub const FHIR_ONTOLOGY: &str = "http://hl7.org/fhir/fhir.ttl";
}

/// FHIR terms used in observation documents
pub mod fhir {
    /// `fhir:Observation`
    pub const OBSERVATION: &str = "http://hl7.org/fhir/Observation";
    /// `fhir:Patient`
    pub const PATIENT: &str = "http://hl7.org/fhir/Patient";
    /// `fhir:value`
    pub const VALUE: &str = "http://hl7.org/fhir/value";
    /// `fhir:link`
    pub const LINK: &str = "http://hl7.org/fhir/link";
    /// `fhir:index`
    pub const INDEX: &str = "http://hl7.org/fhir/index";
    /// `fhir:nodeRole`
    pub const NODE_ROLE: &str = "http://hl7.org/fhir/nodeRole";
    /// `fhir:treeRoot`
    pub const TREE_ROOT: &str = "http://hl7.org/fhir/treeRoot";
    /// `fhir:Observation.status`
    pub const OBSERVATION_STATUS: &str = "http://hl7.org/fhir/Observation.status";
    /// `fhir:Observation.code`
    pub const OBSERVATION_CODE: &str = "http://hl7.org/fhir/Observation.code";
    /// `fhir:Observation.subject`
    pub const OBSERVATION_SUBJECT: &str = "http://hl7.org/fhir/Observation.subject";
    /// `fhir:Observation.effectiveDateTime`
    pub const OBSERVATION_EFFECTIVE_DATE_TIME: &str =
        "http://hl7.org/fhir/Observation.effectiveDateTime";
    /// `fhir:Observation.valueQuantity`
    pub const OBSERVATION_VALUE_QUANTITY: &str = "http://hl7.org/fhir/Observation.valueQuantity";
    /// `fhir:CodeableConcept.coding`
    pub const CODEABLE_CONCEPT_CODING: &str = "http://hl7.org/fhir/CodeableConcept.coding";
    /// `fhir:CodeableConcept.text`
    pub const CODEABLE_CONCEPT_TEXT: &str = "http://hl7.org/fhir/CodeableConcept.text";
    /// `fhir:Coding.system`
    pub const CODING_SYSTEM: &str = "http://hl7.org/fhir/Coding.system";
    /// `fhir:Coding.code`
    pub const CODING_CODE: &str = "http://hl7.org/fhir/Coding.code";
    /// `fhir:Coding.display`
    pub const CODING_DISPLAY: &str = "http://hl7.org/fhir/Coding.display";
    /// `fhir:Quantity.value`
    pub const QUANTITY_VALUE: &str = "http://hl7.org/fhir/Quantity.value";
    /// `fhir:Quantity.unit`
    pub const QUANTITY_UNIT: &str = "http://hl7.org/fhir/Quantity.unit";
    /// `fhir:Quantity.system`
    pub const QUANTITY_SYSTEM: &str = "http://hl7.org/fhir/Quantity.system";
    /// `fhir:Quantity.code`
    pub const QUANTITY_CODE: &str = "http://hl7.org/fhir/Quantity.code";
    /// Observation status written for every uploaded record
    pub const STATUS_FINAL: &str = "final";
}

/// LOINC clinical codes
pub mod loinc {
    /// Coding system IRI for LOINC
    pub const SYSTEM: &str = "http://loinc.org";
    /// Heart rate
    pub const HEART_RATE: &str = "8867-4";
    /// Step count (24 hour)
    pub const STEPS: &str = "55423-8";
    /// Distance walked (24 hour)
    pub const DISTANCE: &str = "41953-1";
}

/// Unified Code for Units of Measure
pub mod ucum {
    /// UCUM system IRI
    pub const SYSTEM: &str = "http://unitsofmeasure.org";
}

/// Pod layout and HTTP protocol values
pub mod pod {
    /// Container created on bootstrap, relative to the pod root
    pub const DEFAULT_CONTAINER_PATH: &str = "/private/health/";
    /// Observation document created inside the container
    pub const DEFAULT_OBSERVATION_FILE: &str = "fitness.ttl";
    /// Fragment of the type registration inserted on bootstrap
    pub const REGISTRATION_FRAGMENT: &str = "#FHIRObservation";
    /// Title of the bootstrapped container
    pub const CONTAINER_TITLE: &str = "FHIR Health Observations";
    /// Content type of PATCH bodies
    pub const SPARQL_UPDATE: &str = "application/sparql-update";
    /// Content type of Turtle documents
    pub const TEXT_TURTLE: &str = "text/turtle";
}

/// Reconciliation defaults
pub mod sync {
    /// Triple blocks per upload PATCH
    pub const UPLOAD_BATCH_SIZE: usize = 50;
    /// Minimum absolute difference that schedules a MODIFY
    pub const MODIFY_TOLERANCE: f64 = 0.01;
    /// Heart-rate burst window in milliseconds
    pub const HEART_RATE_COLLAPSE_WINDOW_MS: i64 = 60_000;
    /// Heart-rate burst value delta
    pub const HEART_RATE_COLLAPSE_DELTA: f64 = 1.0;
}

/// HTTP client defaults
pub mod timeouts {
    /// Per-request timeout for pod calls
    pub const POD_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout for pod and provider calls
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Status descriptions published on the status bus
pub mod status_messages {
    /// Initial status before any identity is known
    pub const SETTING_UP: &str = "Setting up...";
    /// Profile document is being fetched
    pub const LOADING_PROFILE: &str = "Loading profile";
    /// Type index is being fetched
    pub const LOADING_TYPE_INDEX: &str = "Loading private type index";
    /// Observation document is being fetched
    pub const LOADING_OBSERVATIONS: &str = "Loading data from pod";
    /// Load chain finished
    pub const DONE: &str = "Done";
    /// Load chain failed
    pub const LOAD_FAILED: &str = "Could not load profile";
    /// MODIFY phase prefix
    pub const UPDATING: &str = "Updating pod data for";
    /// Upload phase prefix
    pub const SYNCING: &str = "Syncing data to pod for";
    /// Run finished with nothing left to upload
    pub const UP_TO_DATE: &str = "Everything up to date";
    /// Run failed
    pub const SYNC_FAILED: &str = "Could not sync data";
    /// No identity is active
    pub const LOGGED_OUT: &str = "Logged out";
}

/// Service identification for logs
pub mod service_names {
    /// Service name used in structured logs
    pub const SOLID_HEALTH_SYNC: &str = "solid-health-sync";
}
