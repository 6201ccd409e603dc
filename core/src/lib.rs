// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Decrypt-and-validate core of the credential broker.
//!
//! Everything in this crate is a synchronous, per-request computation over
//! its inputs plus read-only calls to the [`keystore::KeyStore`] and
//! [`catalog::CatalogLookup`] collaborators. There is no internal state to
//! roll back; abandoning an in-flight call is always safe.

pub mod authorizer;
pub mod catalog;
pub mod cipher;
pub mod errors;
pub mod keystore;
