// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// Header carrying the caller identity as a `name,flag` pair.
pub const AUTHORIZATION_HEADER: &str = "x-broker-auth";

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MiB

/// Length of the random part of generated identifiers.
pub const ID_LENGTH: usize = 20;

// Validation constants for request models
pub const MAX_SITE_ID_LENGTH: u64 = 256;
pub const MAX_NAME_LENGTH: u64 = 256;
pub const MAX_REFERENCE_LENGTH: u64 = 256;
pub const MAX_ENVELOPE_LENGTH: u64 = 8192;
