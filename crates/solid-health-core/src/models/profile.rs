// ABOUTME: Linked-data profile resolved from a WebID document
// ABOUTME: Name, image, known friends and the private type index pointer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Profile of the active identity
///
/// # Examples
///
/// ```rust
/// use solid_health_core::models::Profile;
///
/// let profile = Profile::new("https://alice.pod.example/profile/card#me");
/// assert!(profile.friends.is_empty());
/// assert!(profile.private_type_index.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// WebID the profile was loaded for
    pub web_id: String,
    /// `foaf:name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `foaf:img`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `foaf:knows` targets
    pub friends: BTreeSet<String>,
    /// `solid:privateTypeIndex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_type_index: Option<String>,
}

impl Profile {
    /// Empty profile for a WebID
    pub fn new(web_id: impl Into<String>) -> Self {
        Self {
            web_id: web_id.into(),
            name: None,
            image: None,
            friends: BTreeSet::new(),
            private_type_index: None,
        }
    }
}
