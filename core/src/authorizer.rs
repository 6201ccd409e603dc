// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Authorization state machine for cluster-creation requests.
//!
//! A request names a credential and (optionally) an implementation. The
//! checks run strictly in this order, short-circuiting on the first
//! failure so rejection messages are deterministic:
//!
//! 1. an implementation must be named at all;
//! 2. the credential must exist;
//! 3. the implementation must exist;
//! 4. the implementation's site must match the credential's site.
//!
//! The authorizer only reads from the catalog; creating the cluster record
//! after a grant is the caller's job. The site-consistency invariant is
//! enforced at creation time only, never re-checked afterwards.

use crate::catalog::{CatalogLookup, CredentialRecord, ImplementationRecord};

/// Why a cluster-creation request was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The request named no implementation. Raised before any catalog read.
    #[error("cannot create a cluster without an implementation")]
    ImplementationRequired,
    #[error("credential {0:?} not found")]
    CredentialNotFound(String),
    #[error("implementation {0:?} not found")]
    ImplementationNotFound(String),
    #[error("implementation site {implementation_site:?} does not match credential site {credential_site:?}")]
    SiteMismatch {
        credential_site: String,
        implementation_site: String,
    },
}

/// Proof that a request passed every check, carrying the records the
/// checks were evaluated against so the caller can stamp the site onto the
/// new cluster without re-reading the catalog.
#[derive(Debug, Clone)]
pub struct ClusterGrant {
    pub credential: CredentialRecord,
    pub implementation: ImplementationRecord,
}

/// Validates cluster-creation requests against the catalog.
pub struct ClusterAuthorizer<'a> {
    catalog: &'a dyn CatalogLookup,
}

impl<'a> ClusterAuthorizer<'a> {
    pub fn new(catalog: &'a dyn CatalogLookup) -> Self {
        Self { catalog }
    }

    /// Runs the ordered checks for one request.
    ///
    /// Read-only: performs at most two catalog lookups and mutates nothing.
    pub fn authorize(
        &self,
        credential_id: &str,
        implementation_id: Option<&str>,
    ) -> Result<ClusterGrant, Rejection> {
        let implementation_id = implementation_id.ok_or(Rejection::ImplementationRequired)?;

        let credential = self
            .catalog
            .credential(credential_id)
            .ok_or_else(|| Rejection::CredentialNotFound(credential_id.to_string()))?;

        let implementation = self
            .catalog
            .implementation(implementation_id)
            .ok_or_else(|| Rejection::ImplementationNotFound(implementation_id.to_string()))?;

        if credential.site != implementation.site {
            return Err(Rejection::SiteMismatch {
                credential_site: credential.site,
                implementation_site: implementation.site,
            });
        }

        Ok(ClusterGrant {
            credential,
            implementation,
        })
    }
}
