// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    MAX_ENVELOPE_LENGTH, MAX_NAME_LENGTH, MAX_REFERENCE_LENGTH, MAX_SITE_ID_LENGTH,
};
use crate::store::{StoredCluster, StoredCredential};

/// Body of `POST /credentials/`.
///
/// `credentials` is the base64 envelope produced by the client-side
/// encoder. It is stored opaquely and never echoed back.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCredentialRequest {
    #[validate(length(min = 1, max = MAX_SITE_ID_LENGTH))]
    pub site: String,

    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(min = 1, max = MAX_ENVELOPE_LENGTH))]
    pub credentials: String, // base64 encoded
}

/// Credential metadata returned on every read path.
///
/// Deliberately has no field for the envelope or its plaintext; building a
/// response from a [`StoredCredential`] drops the ciphertext by
/// construction (redaction invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub id: String,
    pub created: String,
    pub site: String,
    pub user: String,
    pub name: String,
}

impl From<&StoredCredential> for CredentialResponse {
    fn from(credential: &StoredCredential) -> Self {
        Self {
            id: credential.id.clone(),
            created: credential.created.clone(),
            site: credential.site.clone(),
            user: credential.owner.clone(),
            name: credential.name.clone(),
        }
    }
}

/// Body of `POST /clusters/`.
///
/// `implementation` stays optional at the type level so its omission
/// reaches the authorizer and is refused there, with the same message for
/// every caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClusterRequest {
    #[validate(length(min = 1, max = MAX_REFERENCE_LENGTH))]
    pub credential: String,

    #[validate(length(min = 1, max = MAX_REFERENCE_LENGTH))]
    pub implementation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResponse {
    pub id: String,
    pub credential: String,
    pub implementation: String,
    pub site: String,
    pub user: String,
    pub created: String,
}

impl From<&StoredCluster> for ClusterResponse {
    fn from(cluster: &StoredCluster) -> Self {
        Self {
            id: cluster.id.clone(),
            credential: cluster.credential.clone(),
            implementation: cluster.implementation.clone(),
            site: cluster.site.clone(),
            user: cluster.owner.clone(),
            created: cluster.created.clone(),
        }
    }
}
