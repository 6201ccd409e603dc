// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Gateway Broker
//!
//! HTTP front end of the credential broker.
//!
//! This crate provides the CRUD plumbing around the `core-broker` crate:
//! it stores encrypted credential envelopes opaquely, redacts them from
//! every read path, and gates cluster creation behind the core's
//! consistency checks.
//!
//! ## Architecture
//!
//! ```text
//! Client -> HTTP API -> Gateway (this crate) -> core-broker
//!                            |
//!                            +-> site/implementation registry (catalog)
//!                            +-> profile/credential/cluster store
//! ```
//!
//! ## Modules
//!
//! - [`application`]: HTTP server setup with Axum and the body-size limit
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: Configuration constants for the application
//! - [`errors`]: Application error types with HTTP response mapping
//! - [`identity`]: Pluggable caller-identity resolution
//! - [`models`]: Request/response types with validation
//! - [`routes`]: HTTP route handlers
//! - [`store`]: In-memory persistence and registry collaborators
//!
//! ## Usage
//!
//! ```bash
//! gateway-broker --host 127.0.0.1 --port 8002 --cipher-scheme pkcs1v15
//! ```
//!
//! ## Security Considerations
//!
//! - Credential envelopes are write-only: no read path ever serializes
//!   ciphertext or plaintext
//! - Private key material is zeroized on drop and redacted from Debug output
//! - Request validation enforces strict size limits to prevent abuse
//! - Identity is resolved before any other handler logic runs

pub mod application;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod models;
pub mod routes;
pub mod store;
