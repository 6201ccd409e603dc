// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Caller-identity resolution.
//!
//! Identity is resolved before any other handler logic runs. The resolver
//! is a pluggable capability: the default [`HeaderIdentity`] trusts a
//! `name,flag` pair in the [`AUTHORIZATION_HEADER`], which stands in for a
//! real token-validation authority sitting in front of the broker. A
//! deployment behind such an authority swaps in a resolver that verifies
//! the upstream token instead.

use axum::http::HeaderMap;

use crate::constants::AUTHORIZATION_HEADER;

/// Resolves the caller identity for a request, or `None` when the caller
/// is unauthenticated.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<String>;
}

/// Header-based identity: `name,flag` where flag `1` marks a session the
/// upstream authority has validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIdentity;

impl IdentityResolver for HeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(AUTHORIZATION_HEADER)?.to_str().ok()?;
        let (name, flag) = value.split_once(',')?;
        if flag != "1" || name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }
}
