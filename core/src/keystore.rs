// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Private-key lookup for credential owners.
//!
//! A profile owns exactly one private-key record. The key material is
//! opaque PKCS#8 DER, set once at provisioning time; rotation is out of
//! scope. [`KeyStore`] abstracts over the real persistence-backed store
//! and the in-memory store used by tests and single-instance deployments.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use aws_lc_rs::encoding::AsDer;
use aws_lc_rs::error::Unspecified;
use aws_lc_rs::rsa::{KeySize, PrivateDecryptingKey};
use zeroize::ZeroizeOnDrop;

/// Opaque private-key material bound to a profile (PKCS#8 v1 DER).
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(der: Vec<u8>) -> Self {
        Self(der)
    }

    /// Generates a fresh RSA-2048 key pair.
    ///
    /// Provisioning/test tooling only; key management is not a feature of
    /// the broker itself.
    pub fn generate() -> Result<Self, Unspecified> {
        let key = PrivateDecryptingKey::generate(KeySize::Rsa2048)?;
        let der = key.as_der()?;
        Ok(Self(der.as_ref().to_vec()))
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Custom Debug implementation to prevent accidental logging of key material
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyMaterial").field(&"[REDACTED]").finish()
    }
}

/// Resolves a credential owner to that owner's private key material.
pub trait KeyStore: Send + Sync {
    /// Returns the key material for `owner`, or `None` when no profile
    /// with key material exists for that owner.
    fn private_key(&self, owner: &str) -> Option<KeyMaterial>;
}

/// In-memory key store.
///
/// Keys are injected explicitly by the embedding application or test,
/// never through process-wide mutable configuration.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, KeyMaterial>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, owner: impl Into<String>, material: KeyMaterial) {
        let mut keys = self.keys.write().unwrap();
        keys.insert(owner.into(), material);
    }
}

impl KeyStore for MemoryKeyStore {
    fn private_key(&self, owner: &str) -> Option<KeyMaterial> {
        let keys = self.keys.read().unwrap();
        keys.get(owner).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key_material() {
        let material = KeyMaterial::new(vec![1, 2, 3, 4]);
        let printed = format!("{:?}", material);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains('1'));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryKeyStore::new();
        assert!(store.private_key("alice").is_none());

        store.insert("alice", KeyMaterial::new(vec![7; 16]));
        let material = store.private_key("alice").unwrap();
        assert_eq!(material.as_ref(), &[7; 16]);
        assert!(store.private_key("bob").is_none());
    }

    #[test]
    fn test_generate_produces_parseable_pkcs8() {
        let material = KeyMaterial::generate().unwrap();
        assert!(PrivateDecryptingKey::from_pkcs8(material.as_ref()).is_ok());
    }
}
