// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the broker API.
//!
//! This module provides the following endpoints:
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/` | [`health`] | Health check endpoint |
//! | GET | `/health` | [`health`] | Health check endpoint |
//! | POST | `/credentials/` | [`create_credential`] | Store an encrypted credential |
//! | GET | `/credentials/` | [`list_credentials`] | List credential metadata |
//! | GET | `/credentials/{id}/` | [`get_credential`] | Single credential metadata |
//! | POST | `/clusters/` | [`create_cluster`] | Authorize and create a cluster |
//! | GET | `/clusters/{id}/` | [`get_cluster`] | Read back a created cluster |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use chrono::Utc;
use core_broker::authorizer::ClusterAuthorizer;
use core_broker::cipher::CredentialCipher;
use serde_json::json;
use validator::Validate;

use crate::application::AppState;
use crate::errors::AppError;
use crate::models::{
    ClusterResponse, CreateClusterRequest, CreateCredentialRequest, CredentialResponse,
};
use crate::store::{new_id, StoredCluster, StoredCredential};

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Stores an encrypted credential envelope.
///
/// # Request Flow
///
/// 1. Resolve the caller identity (403 before any other logic)
/// 2. Validate the incoming [`CreateCredentialRequest`]
/// 3. Resolve the referenced site in the registry
/// 4. Provision the owner's key pair on first write
/// 5. Check the envelope: full decrypt when validate-on-write is enabled,
///    otherwise only that it is base64 (decryption stays lazy)
/// 6. Persist the envelope opaquely and return metadata only
///
/// # Errors
///
/// - [`AppError::AuthRequired`] - no validated caller identity
/// - [`AppError::ValidationError`] - request validation failed
/// - [`AppError::SiteNotFound`] - the referenced site does not resolve
/// - [`AppError::Cipher`] - validate-on-write decryption failed
#[tracing::instrument(skip(state, headers, request))]
pub async fn create_credential(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateCredentialRequest>,
) -> Result<(StatusCode, Json<CredentialResponse>), AppError> {
    // 1. Identity first; nothing below runs unauthenticated
    let user = state
        .identity
        .resolve(&headers)
        .ok_or(AppError::AuthRequired)?;

    // 2. Shape limits
    request.validate().map_err(|e| {
        tracing::debug!("[gateway] credential validation failed: {}", e);
        AppError::ValidationError(e.to_string())
    })?;

    // 3. The referenced site must exist in the registry
    if state.registry.site(&request.site).is_none() {
        return Err(AppError::SiteNotFound(request.site));
    }

    // 4. First write provisions the owner's key pair
    state.store.provision_profile(&user)?;

    // 5. Envelope check: lazy by default, full decrypt when configured
    if state.options.validate_on_write {
        let cipher = CredentialCipher::new(state.options.cipher_scheme, state.store.as_ref());
        cipher.decrypt(&request.credentials, &user)?;
    } else if BASE64_STANDARD.decode(&request.credentials).is_err() {
        return Err(AppError::ValidationError(
            "credentials must be base64".to_string(),
        ));
    }

    // 6. Store the envelope opaquely; the response carries metadata only
    let credential = StoredCredential {
        id: new_id("crd"),
        site: request.site,
        name: request.name,
        owner: user,
        created: Utc::now().to_rfc3339(),
        envelope: request.credentials,
    };
    state.store.insert_credential(credential.clone());

    tracing::info!("[gateway] stored credential {}", credential.id);

    Ok((
        StatusCode::CREATED,
        Json(CredentialResponse::from(&credential)),
    ))
}

/// Lists credential metadata. Never includes ciphertext or plaintext.
#[tracing::instrument(skip(state))]
pub async fn list_credentials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CredentialResponse>>, AppError> {
    let credentials = state.store.list_credentials();
    let responses = credentials.iter().map(CredentialResponse::from).collect();
    Ok(Json(responses))
}

/// Returns metadata for a single credential; same redaction rule as the
/// list endpoint.
#[tracing::instrument(skip(state))]
pub async fn get_credential(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CredentialResponse>, AppError> {
    let credential = state
        .store
        .credential(&id)
        .ok_or(AppError::CredentialNotFound(id))?;
    Ok(Json(CredentialResponse::from(&credential)))
}

/// Authorizes and creates a cluster.
///
/// # Request Flow
///
/// 1. Resolve the caller identity
/// 2. Validate the incoming [`CreateClusterRequest`]
/// 3. Run the core authorization checks (credential exists, implementation
///    exists, sites match) against the catalog
/// 4. Persist the cluster with the site stamped from the grant
///
/// # Errors
///
/// - [`AppError::AuthRequired`] - no validated caller identity
/// - [`AppError::ValidationError`] - request validation failed
/// - [`AppError::Rejected`] - an authorization check refused the request
#[tracing::instrument(skip(state, headers, request))]
pub async fn create_cluster(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateClusterRequest>,
) -> Result<(StatusCode, Json<ClusterResponse>), AppError> {
    // 1. Identity first
    let user = state
        .identity
        .resolve(&headers)
        .ok_or(AppError::AuthRequired)?;

    // 2. Shape limits
    request.validate().map_err(|e| {
        tracing::debug!("[gateway] cluster validation failed: {}", e);
        AppError::ValidationError(e.to_string())
    })?;

    // 3. Consistency checks; rejection order is fixed by the authorizer
    let authorizer = ClusterAuthorizer::new(&state.catalog);
    let grant = authorizer.authorize(&request.credential, request.implementation.as_deref())?;

    // 4. Creation is permitted; stamp the matching site onto the record
    let cluster = StoredCluster {
        id: new_id("clu"),
        credential: grant.credential.id,
        implementation: grant.implementation.id,
        site: grant.implementation.site,
        owner: user,
        created: Utc::now().to_rfc3339(),
    };
    state.store.insert_cluster(cluster.clone());

    tracing::info!(
        "[gateway] created cluster {} on site {}",
        cluster.id,
        cluster.site
    );

    Ok((StatusCode::CREATED, Json(ClusterResponse::from(&cluster))))
}

/// Reads back a created cluster.
#[tracing::instrument(skip(state))]
pub async fn get_cluster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClusterResponse>, AppError> {
    let cluster = state.store.cluster(&id).ok_or(AppError::ClusterNotFound(id))?;
    Ok(Json(ClusterResponse::from(&cluster)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    // Unit tests for the health handler; full request/response cycle tests
    // are in tests/http_integration.rs

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
