// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! In-memory persistence and registry collaborators.
//!
//! [`MemoryStore`] holds everything the broker owns: profiles (with their
//! private key material), credential envelopes, and created clusters.
//! [`MemoryRegistry`] mirrors the external site/appliance catalog and is
//! seeded explicitly by the deployment or by tests; there is no
//! process-wide mutable configuration. [`Catalog`] bridges both into the
//! core's `CatalogLookup` contract.
//!
//! Data is lost on restart; a persistence-backed deployment supplies its
//! own implementations of the core `KeyStore`/`CatalogLookup` traits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use core_broker::catalog::{CatalogLookup, CredentialRecord, ImplementationRecord};
use core_broker::keystore::{KeyMaterial, KeyStore};

use crate::constants::ID_LENGTH;

/// A credential at rest: metadata plus the opaque envelope.
///
/// The envelope never leaves the store through a serialized response; see
/// [`crate::models::CredentialResponse`].
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub id: String,
    pub site: String,
    pub name: String,
    pub owner: String,
    pub created: String,
    pub envelope: String,
}

/// A cluster created after authorization passed. `site` is stamped from
/// the grant at creation time and never re-checked.
#[derive(Debug, Clone)]
pub struct StoredCluster {
    pub id: String,
    pub credential: String,
    pub implementation: String,
    pub site: String,
    pub owner: String,
    pub created: String,
}

/// A target deployment endpoint, read-only to the broker.
#[derive(Debug, Clone)]
pub struct SiteRecord {
    pub id: String,
    pub api_url: String,
}

/// In-memory store for profiles, credentials, and clusters.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, KeyMaterial>>,
    credentials: RwLock<HashMap<String, StoredCredential>>,
    clusters: RwLock<HashMap<String, StoredCluster>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates key material for `owner` on first sight. Key material is
    /// immutable once set; later calls are no-ops.
    pub fn provision_profile(&self, owner: &str) -> Result<()> {
        {
            let profiles = self.profiles.read().unwrap();
            if profiles.contains_key(owner) {
                return Ok(());
            }
        }
        let material = KeyMaterial::generate()
            .map_err(|err| anyhow!("unable to generate key material: {:?}", err))?;
        let mut profiles = self.profiles.write().unwrap();
        profiles.entry(owner.to_string()).or_insert(material);
        Ok(())
    }

    /// Installs pre-generated key material, for provisioning and tests.
    pub fn insert_profile(&self, owner: impl Into<String>, material: KeyMaterial) {
        let mut profiles = self.profiles.write().unwrap();
        profiles.insert(owner.into(), material);
    }

    pub fn insert_credential(&self, credential: StoredCredential) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.insert(credential.id.clone(), credential);
    }

    pub fn credential(&self, id: &str) -> Option<StoredCredential> {
        let credentials = self.credentials.read().unwrap();
        credentials.get(id).cloned()
    }

    pub fn list_credentials(&self) -> Vec<StoredCredential> {
        let credentials = self.credentials.read().unwrap();
        let mut all: Vec<StoredCredential> = credentials.values().cloned().collect();
        all.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        all
    }

    pub fn insert_cluster(&self, cluster: StoredCluster) {
        let mut clusters = self.clusters.write().unwrap();
        clusters.insert(cluster.id.clone(), cluster);
    }

    pub fn cluster(&self, id: &str) -> Option<StoredCluster> {
        let clusters = self.clusters.read().unwrap();
        clusters.get(id).cloned()
    }
}

impl KeyStore for MemoryStore {
    fn private_key(&self, owner: &str) -> Option<KeyMaterial> {
        let profiles = self.profiles.read().unwrap();
        profiles.get(owner).cloned()
    }
}

/// In-memory mirror of the external site/appliance registry.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    sites: RwLock<HashMap<String, SiteRecord>>,
    implementations: RwLock<HashMap<String, ImplementationRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_site(&self, site: SiteRecord) {
        let mut sites = self.sites.write().unwrap();
        sites.insert(site.id.clone(), site);
    }

    pub fn site(&self, id: &str) -> Option<SiteRecord> {
        let sites = self.sites.read().unwrap();
        sites.get(id).cloned()
    }

    pub fn register_implementation(&self, implementation: ImplementationRecord) {
        let mut implementations = self.implementations.write().unwrap();
        implementations.insert(implementation.id.clone(), implementation);
    }

    pub fn implementation(&self, id: &str) -> Option<ImplementationRecord> {
        let implementations = self.implementations.read().unwrap();
        implementations.get(id).cloned()
    }
}

/// Catalog view over the local credential store and the registry.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<MemoryStore>,
    registry: Arc<MemoryRegistry>,
}

impl Catalog {
    pub fn new(store: Arc<MemoryStore>, registry: Arc<MemoryRegistry>) -> Self {
        Self { store, registry }
    }
}

impl CatalogLookup for Catalog {
    fn credential(&self, id: &str) -> Option<CredentialRecord> {
        self.store.credential(id).map(|credential| CredentialRecord {
            id: credential.id,
            site: credential.site,
            owner: credential.owner,
            envelope: credential.envelope,
        })
    }

    fn implementation(&self, id: &str) -> Option<ImplementationRecord> {
        self.registry.implementation(id)
    }
}

/// Generates a prefixed random identifier, e.g. `crd_h2l9x...`.
pub fn new_id(prefix: &str) -> String {
    let random: String = std::iter::repeat_with(fastrand::alphanumeric)
        .take(ID_LENGTH)
        .collect();
    format!("{prefix}_{random}")
}
