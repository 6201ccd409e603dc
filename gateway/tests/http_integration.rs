// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP integration tests for the broker API.
//!
//! These tests use `axum-test` to exercise the full request/response cycle
//! through the Axum router, covering the credential write/read paths, the
//! cluster authorization checks, and the redaction rule.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Bytes;
use axum_test::TestServer;
use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use core_broker::catalog::ImplementationRecord;
use core_broker::cipher::{seal, Scheme};
use core_broker::keystore::KeyMaterial;
use gateway_broker::application::create_router;
use gateway_broker::configuration::GatewayOptions;
use gateway_broker::constants::AUTHORIZATION_HEADER;
use gateway_broker::identity::HeaderIdentity;
use gateway_broker::store::{MemoryRegistry, MemoryStore, SiteRecord};

const SITE: &str = "some-site-id";
const OTHER_SITE: &str = "other-site";
const ALICE_VALID: &str = "alice,1";
const ALICE_INVALID: &str = "alice,0";

struct TestApp {
    server: TestServer,
    store: Arc<MemoryStore>,
}

/// Builds a test server with one site and two implementations registered:
/// `impl-matching` on [`SITE`] and `impl-elsewhere` on [`OTHER_SITE`].
fn test_app_with(options: GatewayOptions) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(MemoryRegistry::new());

    registry.register_site(SiteRecord {
        id: SITE.to_string(),
        api_url: "http://localhost:44000/v3".to_string(),
    });
    registry.register_implementation(ImplementationRecord {
        id: "impl-matching".to_string(),
        site: SITE.to_string(),
        appliance: Some("magic".to_string()),
        script: Some("heat_template_version: 2014-04-04\nscript: something\n".to_string()),
    });
    registry.register_implementation(ImplementationRecord {
        id: "impl-elsewhere".to_string(),
        site: OTHER_SITE.to_string(),
        appliance: Some("magic".to_string()),
        script: None,
    });

    let app = create_router(options, Arc::new(HeaderIdentity), store.clone(), registry);
    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
    }
}

fn test_app() -> TestApp {
    test_app_with(GatewayOptions::default())
}

/// Base64(JSON) envelope, as the original unreliable client encoder
/// produces when no real encryption is in play (lazy validation).
fn obfuscate(payload: &serde_json::Value) -> String {
    BASE64_STANDARD.encode(payload.to_string())
}

fn sample_payload() -> serde_json::Value {
    serde_json::json!({
        "username": "magic",
        "password": "johnson",
        "project_name": "spartans",
    })
}

async fn create_credential(app: &TestApp) -> String {
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": obfuscate(&sample_payload()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_root_and_health_return_ok() {
    let app = test_app();
    app.server.get("/").await.assert_status_ok();
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_refuse_unauthenticated_credential_create() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": obfuscate(&sample_payload()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refuse_invalid_session_flag() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_INVALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": obfuscate(&sample_payload()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_credential_returns_metadata_only() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": obfuscate(&sample_payload()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    for key in ["id", "created", "site", "user"] {
        assert!(body.get(key).is_some(), "missing key {key}");
    }
    assert!(body.get("credentials").is_none());
    assert_eq!(body["site"], SITE);
    assert_eq!(body["user"], "alice");
}

#[tokio::test]
async fn test_refuse_credential_for_unknown_site() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": "non-existent",
            "name": "me@site2",
            "credentials": obfuscate(&sample_payload()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refuse_non_base64_envelope() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": "!!! not base64 !!!",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_credentials_redacts_envelopes() {
    let app = test_app();
    create_credential(&app).await;

    let response = app.server.get("/credentials/").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].get("credentials").is_none());
    assert!(all[0].get("envelope").is_none());
}

#[tokio::test]
async fn test_single_credential_read_is_write_only() {
    let app = test_app();
    let id = create_credential(&app).await;

    let response = app.server.get(&format!("/credentials/{id}/")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], id.as_str());
    assert!(body.get("credentials").is_none());
    // the payload fields must not leak either
    assert!(!body.to_string().contains("johnson"));
}

#[tokio::test]
async fn test_unknown_credential_read_is_404() {
    let app = test_app();
    let response = app.server.get("/credentials/crd_missing/").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_cluster_requires_implementation() {
    let app = test_app();
    let id = create_credential(&app).await;

    let response = app
        .server
        .post("/clusters/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({"credential": id}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let message = response.text().to_lowercase();
    assert!(message.contains("implementation"));
}

#[tokio::test]
async fn test_create_cluster_with_matching_site() {
    let app = test_app();
    let id = create_credential(&app).await;

    let response = app
        .server
        .post("/clusters/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "credential": id,
            "implementation": "impl-matching",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["site"], SITE);
    assert_eq!(body["credential"], id.as_str());

    // read-back
    let cluster_id = body["id"].as_str().unwrap();
    let response = app.server.get(&format!("/clusters/{cluster_id}/")).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_cluster_credential_must_exist() {
    let app = test_app();
    create_credential(&app).await;

    let response = app
        .server
        .post("/clusters/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "credential": "garbage",
            "implementation": "impl-matching",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let message = response.text().to_lowercase();
    assert!(message.contains("credential"));
    assert!(message.contains("not found"));
}

#[tokio::test]
async fn test_cluster_implementation_must_exist() {
    let app = test_app();
    let id = create_credential(&app).await;

    let response = app
        .server
        .post("/clusters/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "credential": id,
            "implementation": "non-existent",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let message = response.text().to_lowercase();
    assert!(message.contains("implementation"));
    assert!(message.contains("found"));
}

#[tokio::test]
async fn test_cluster_implementation_site_must_match() {
    let app = test_app();
    let id = create_credential(&app).await;

    let response = app
        .server
        .post("/clusters/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "credential": id,
            "implementation": "impl-elsewhere",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let message = response.text().to_lowercase();
    assert!(message.contains("match"));
    assert!(message.contains("site"));
}

#[tokio::test]
async fn test_oversized_request_body_returns_413() {
    let app = test_app();
    let oversized_body = vec![b'a'; 1024 * 1024 + 1];
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .content_type("application/json")
        .bytes(Bytes::from(oversized_body))
        .await;
    response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_malformed_json_body_returns_400() {
    let app = test_app();
    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .content_type("application/json")
        .bytes(Bytes::from("{invalid json"))
        .await;
    response.assert_status_bad_request();
}

// =========================================================================
// Validate-on-write: the gateway decrypts the envelope at create time
// =========================================================================

fn validate_on_write_options() -> GatewayOptions {
    GatewayOptions {
        validate_on_write: true,
        ..GatewayOptions::default()
    }
}

#[tokio::test]
async fn test_validate_on_write_accepts_sealed_envelope() {
    let app = test_app_with(validate_on_write_options());

    // Provision alice's key up front so the test can seal against it.
    let material = KeyMaterial::generate().unwrap();
    app.store.insert_profile("alice", material.clone());

    let envelope = seal(
        Scheme::Pkcs1V15,
        &material,
        sample_payload().to_string().as_bytes(),
    )
    .unwrap();

    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": envelope,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn test_validate_on_write_rejects_undecryptable_envelope() {
    let app = test_app_with(validate_on_write_options());

    app.store
        .insert_profile("alice", KeyMaterial::generate().unwrap());

    // Sealed under a different key pair than alice's.
    let envelope = seal(
        Scheme::Pkcs1V15,
        &KeyMaterial::generate().unwrap(),
        sample_payload().to_string().as_bytes(),
    )
    .unwrap();

    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": envelope,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_validate_on_write_flags_missing_payload_boundary() {
    let app = test_app_with(validate_on_write_options());

    let material = KeyMaterial::generate().unwrap();
    app.store.insert_profile("alice", material.clone());

    // Decrypts fine but contains no `{` anywhere.
    let envelope = seal(Scheme::Pkcs1V15, &material, b"no json in here").unwrap();

    let response = app
        .server
        .post("/credentials/")
        .add_header(AUTHORIZATION_HEADER, ALICE_VALID)
        .json(&serde_json::json!({
            "site": SITE,
            "name": "me@site",
            "credentials": envelope,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let message = response.text().to_lowercase();
    assert!(message.contains("json"));
}
