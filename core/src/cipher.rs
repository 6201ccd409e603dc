// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Asymmetric decryption of credential envelopes.
//!
//! An envelope is a base64-encoded RSA-encrypted blob whose plaintext holds
//! a JSON credential payload. The encrypting client is unreliable: the
//! decrypted bytes may carry leading non-JSON garbage before the payload.
//! Decryption therefore scans for the first `{` and parses from that offset
//! onward. The scan is a compatibility shim, not a general parser: when no
//! `{` is present the routine fails with [`CipherError::NoEmbeddedPayload`]
//! rather than returning empty data.
//!
//! # Error taxonomy
//!
//! Each failure mode is a distinct variant so callers can map client
//! conditions (bad input, unknown owner) and server conditions (wrong key,
//! incompatible upstream encoder) to different responses, and so operators
//! can tell a wrong-key failure from a format-compatibility failure.

use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;

use aws_lc_rs::rsa::{
    OaepPrivateDecryptingKey, OaepPublicEncryptingKey, Pkcs1PrivateDecryptingKey,
    Pkcs1PublicEncryptingKey, PrivateDecryptingKey, OAEP_SHA256_MGF1SHA256,
};
use serde_json::Value;

use crate::keystore::{KeyMaterial, KeyStore};

/// Asymmetric scheme applied to envelopes.
///
/// A configuration parameter of the deployment, not a per-envelope choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// RSA PKCS#1 v1.5 encryption padding.
    Pkcs1V15,
    /// RSA-OAEP with SHA-256 and MGF1-SHA-256.
    OaepSha256,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Pkcs1V15 => "pkcs1v15",
            Scheme::OaepSha256 => "oaep-sha256",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pkcs1v15" => Ok(Scheme::Pkcs1V15),
            "oaep-sha256" => Ok(Scheme::OaepSha256),
            other => Err(format!("unknown cipher scheme: {other:?}")),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CipherError {
    /// The envelope text is not valid base64.
    #[error("envelope is not valid base64: {0}")]
    MalformedEnvelope(#[from] base64::DecodeError),
    /// The key store has no key material for the owner.
    #[error("no key material for owner {0:?}")]
    UnknownOwner(String),
    /// Cryptographic decrypt failure: wrong key or corrupt ciphertext.
    #[error("unable to decrypt envelope")]
    DecryptionFailed,
    /// The decrypted bytes contain no `{` anywhere.
    #[error("decrypted payload contains no JSON object start")]
    NoEmbeddedPayload,
    /// The bytes after the first `{` are not a valid JSON document.
    #[error("decrypted payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// Encoder-side failure while sealing a payload.
    #[error("unable to seal payload")]
    SealFailed,
}

/// Recovers JSON credential payloads from envelopes.
pub struct CredentialCipher<'a> {
    scheme: Scheme,
    keys: &'a dyn KeyStore,
}

impl<'a> CredentialCipher<'a> {
    pub fn new(scheme: Scheme, keys: &'a dyn KeyStore) -> Self {
        Self { scheme, keys }
    }

    /// Decrypts `envelope` with the private key of `owner` and parses the
    /// embedded JSON payload.
    ///
    /// Pure apart from the key-store read; performs no retries and keeps no
    /// state. Payload keys (commonly `username`, `password`, `project_name`)
    /// are not validated here; schema is the caller's concern.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedEnvelope`] - envelope is not base64
    /// - [`CipherError::UnknownOwner`] - no key material for `owner`
    /// - [`CipherError::DecryptionFailed`] - RSA decrypt failed
    /// - [`CipherError::NoEmbeddedPayload`] - no `{` in the plaintext
    /// - [`CipherError::InvalidPayload`] - bytes after `{` are not JSON
    pub fn decrypt(&self, envelope: &str, owner: &str) -> Result<Value, CipherError> {
        let ciphertext = BASE64_STANDARD.decode(envelope)?;

        let material = self
            .keys
            .private_key(owner)
            .ok_or_else(|| CipherError::UnknownOwner(owner.to_string()))?;

        let plaintext = open_envelope(self.scheme, &material, &ciphertext)?;

        // The upstream encoder sometimes prepends garbage bytes; skip to
        // the first object-start byte before parsing.
        let start = plaintext
            .iter()
            .position(|&byte| byte == b'{')
            .ok_or(CipherError::NoEmbeddedPayload)?;

        let payload = serde_json::from_slice(&plaintext[start..])?;
        Ok(payload)
    }
}

fn open_envelope(
    scheme: Scheme,
    material: &KeyMaterial,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let key = PrivateDecryptingKey::from_pkcs8(material.as_ref())
        .map_err(|_| CipherError::DecryptionFailed)?;

    match scheme {
        Scheme::Pkcs1V15 => {
            let key =
                Pkcs1PrivateDecryptingKey::new(key).map_err(|_| CipherError::DecryptionFailed)?;
            let mut output = vec![0u8; key.min_output_size()];
            let plaintext = key
                .decrypt(ciphertext, &mut output)
                .map_err(|_| CipherError::DecryptionFailed)?;
            Ok(plaintext.to_vec())
        }
        Scheme::OaepSha256 => {
            let key =
                OaepPrivateDecryptingKey::new(key).map_err(|_| CipherError::DecryptionFailed)?;
            let mut output = vec![0u8; key.min_output_size()];
            let plaintext = key
                .decrypt(&OAEP_SHA256_MGF1SHA256, ciphertext, &mut output, None)
                .map_err(|_| CipherError::DecryptionFailed)?;
            Ok(plaintext.to_vec())
        }
    }
}

/// Encoder-side counterpart of [`CredentialCipher::decrypt`].
///
/// Encrypts `plaintext` under the public half of `material` and returns the
/// base64 envelope. Used for validate-on-write round-trips and tests; the
/// production encoder lives client-side.
///
/// # Errors
///
/// Returns [`CipherError::SealFailed`] when the key material cannot be
/// parsed or the plaintext exceeds the scheme's capacity for the key size.
pub fn seal(scheme: Scheme, material: &KeyMaterial, plaintext: &[u8]) -> Result<String, CipherError> {
    let key =
        PrivateDecryptingKey::from_pkcs8(material.as_ref()).map_err(|_| CipherError::SealFailed)?;
    let public_key = key.public_key();

    let ciphertext = match scheme {
        Scheme::Pkcs1V15 => {
            let key = Pkcs1PublicEncryptingKey::new(public_key)
                .map_err(|_| CipherError::SealFailed)?;
            let mut output = vec![0u8; key.ciphertext_size()];
            let written = key
                .encrypt(plaintext, &mut output)
                .map_err(|_| CipherError::SealFailed)?
                .len();
            output.truncate(written);
            output
        }
        Scheme::OaepSha256 => {
            let key = OaepPublicEncryptingKey::new(public_key)
                .map_err(|_| CipherError::SealFailed)?;
            let mut output = vec![0u8; key.ciphertext_size()];
            let written = key
                .encrypt(&OAEP_SHA256_MGF1SHA256, plaintext, &mut output, None)
                .map_err(|_| CipherError::SealFailed)?
                .len();
            output.truncate(written);
            output
        }
    };

    Ok(BASE64_STANDARD.encode(ciphertext))
}
