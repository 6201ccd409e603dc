// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::{ArgAction, Parser};
use core_broker::cipher::Scheme;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct GatewayOptions {
    #[arg(long, default_value = "127.0.0.1", env("BROKER_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value = "8002", env("BROKER_HTTP_PORT"))]
    pub port: u16,
    /// Asymmetric scheme for credential envelopes (pkcs1v15 | oaep-sha256).
    #[arg(long, default_value = "pkcs1v15", env("BROKER_CIPHER_SCHEME"))]
    pub cipher_scheme: Scheme,
    /// Decrypt submitted envelopes at write time instead of lazily.
    #[arg(long, default_value = "false", env("BROKER_VALIDATE_ON_WRITE"), action = ArgAction::SetTrue)]
    pub validate_on_write: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        GatewayOptions {
            host: "127.0.0.1".to_string(),
            port: 8002,
            cipher_scheme: Scheme::Pkcs1V15,
            validate_on_write: false,
        }
    }
}
