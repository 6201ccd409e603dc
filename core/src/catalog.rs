// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Catalog lookups consumed by the authorization pipeline.
//!
//! Credentials live in the broker's own persistence; implementations come
//! from the external appliance registry. Both are read-mostly and are
//! reached through [`CatalogLookup`] so the authorizer never touches a
//! concrete backend. [`MemoryCatalog`] is the in-memory implementation
//! used by tests and single-instance deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A stored credential as seen by the authorization pipeline.
///
/// `envelope` is the opaque base64 ciphertext; it is carried here so an
/// authorized internal consumer can hand it to the cipher, and must never
/// be serialized onto an external read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    /// Site the credential targets (foreign reference, not owned).
    pub site: String,
    /// Profile that owns the credential and its decryption key.
    pub owner: String,
    /// Base64-encoded asymmetrically-encrypted payload.
    pub envelope: String,
}

/// A deployable appliance/script bound to exactly one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationRecord {
    pub id: String,
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance: Option<String>,
    /// Orchestration template carried opaquely from the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Resolves credential and implementation identifiers to their records.
pub trait CatalogLookup: Send + Sync {
    fn credential(&self, id: &str) -> Option<CredentialRecord>;
    fn implementation(&self, id: &str) -> Option<ImplementationRecord>;
}

/// In-memory catalog, populated through explicit insertion.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    credentials: RwLock<HashMap<String, CredentialRecord>>,
    implementations: RwLock<HashMap<String, ImplementationRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_credential(&self, record: CredentialRecord) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.insert(record.id.clone(), record);
    }

    pub fn insert_implementation(&self, record: ImplementationRecord) {
        let mut implementations = self.implementations.write().unwrap();
        implementations.insert(record.id.clone(), record);
    }
}

impl CatalogLookup for MemoryCatalog {
    fn credential(&self, id: &str) -> Option<CredentialRecord> {
        let credentials = self.credentials.read().unwrap();
        credentials.get(id).cloned()
    }

    fn implementation(&self, id: &str) -> Option<ImplementationRecord> {
        let implementations = self.implementations.read().unwrap();
        implementations.get(id).cloned()
    }
}
