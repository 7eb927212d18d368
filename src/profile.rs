// ABOUTME: Resolves a WebID document into the user's profile
// ABOUTME: Name, image, known friends and private type index pointer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use crate::pod::{Fetcher, GuardedPod};
use crate::rdf::{Graph, Term, TripleStore};
use solid_health_core::constants::iri;
use solid_health_core::errors::SyncResult;
use solid_health_core::models::Profile;

/// Loads profiles from WebID documents
pub struct ProfileLoader<'a> {
    pod: &'a GuardedPod,
}

impl<'a> ProfileLoader<'a> {
    /// Loader reading through `pod`
    #[must_use]
    pub const fn new(pod: &'a GuardedPod) -> Self {
        Self { pod }
    }

    /// Load the profile of `web_id`
    ///
    /// Missing optional fields stay `None` or empty.
    ///
    /// # Errors
    ///
    /// `SyncError::Network` when the profile document is unreachable,
    /// `SyncError::MalformedDocument` when it is not valid Turtle.
    #[instrument(skip(self))]
    pub async fn load(&self, web_id: &str) -> SyncResult<Profile> {
        let mut graph = Graph::new();
        Fetcher::new(self.pod).load(&mut graph, web_id).await?;

        let profile = read_profile(&graph, web_id);
        info!(
            "Loaded profile with {} friends, type index {}",
            profile.friends.len(),
            if profile.private_type_index.is_some() {
                "present"
            } else {
                "missing"
            }
        );
        Ok(profile)
    }
}

/// Extract a profile from an already loaded graph
pub fn read_profile(store: &impl TripleStore, web_id: &str) -> Profile {
    let user = Term::named(web_id);
    let non_empty = |term: &Term| {
        let value = term.value();
        (!value.is_empty()).then(|| value.to_owned())
    };

    let mut profile = Profile::new(web_id);
    profile.name = store.query_single(&user, iri::FOAF_NAME).and_then(non_empty);
    profile.image = store.query_single(&user, iri::FOAF_IMG).and_then(non_empty);
    profile.friends = store
        .query_all(&user, iri::FOAF_KNOWS)
        .into_iter()
        .filter_map(non_empty)
        .collect();
    profile.private_type_index = store
        .query_single(&user, iri::SOLID_PRIVATE_TYPE_INDEX)
        .and_then(Term::as_iri)
        .map(str::to_owned);
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::parse_turtle;

    #[test]
    fn test_read_profile_fields() {
        let body = r#"
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .
            @prefix solid: <http://www.w3.org/ns/solid/terms#> .
            <#me> foaf:name "Alice" ;
                foaf:img <avatar.png> ;
                foaf:knows <https://bob.example/card#me>, <https://carol.example/card#me> ;
                solid:privateTypeIndex </settings/privateTypeIndex.ttl> .
        "#;
        let mut graph = Graph::new();
        graph.extend(parse_turtle("https://alice.pod.example/profile/card", body).unwrap());

        let profile = read_profile(&graph, "https://alice.pod.example/profile/card#me");
        assert_eq!(profile.name.as_deref(), Some("Alice"));
        assert_eq!(
            profile.image.as_deref(),
            Some("https://alice.pod.example/profile/avatar.png")
        );
        assert_eq!(profile.friends.len(), 2);
        assert_eq!(
            profile.private_type_index.as_deref(),
            Some("https://alice.pod.example/settings/privateTypeIndex.ttl")
        );
    }

    #[test]
    fn test_absent_fields_are_not_errors() {
        let graph = Graph::new();
        let profile = read_profile(&graph, "https://alice.pod.example/profile/card#me");
        assert_eq!(profile, Profile::new("https://alice.pod.example/profile/card#me"));
    }
}
