// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Transport-free error classification.
//!
//! The core never logs or swallows a failure; every path returns a tagged
//! result. This module splits those tags into the two classes an embedding
//! front end needs for status mapping: client conditions (bad input,
//! unknown references, consistency violations) and server conditions
//! (cryptographic failures, incompatible upstream data). Auth failures are
//! surfaced by the front end before any core logic runs, so they have no
//! class here.

use crate::authorizer::Rejection;
use crate::cipher::CipherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller supplied bad input; map to a 400-class response.
    Client,
    /// The broker or its data is at fault; map to a 500-class response.
    Server,
}

impl CipherError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CipherError::MalformedEnvelope(_) | CipherError::UnknownOwner(_) => ErrorClass::Client,
            // Wrong-key, boundary-scan, and parse failures are all server
            // conditions, kept as separate variants so operators can tell
            // them apart.
            CipherError::DecryptionFailed
            | CipherError::NoEmbeddedPayload
            | CipherError::InvalidPayload(_)
            | CipherError::SealFailed => ErrorClass::Server,
        }
    }
}

impl Rejection {
    /// Every rejection is a refusal of caller input.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Client
    }
}
