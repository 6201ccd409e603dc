// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_broker::authorizer::Rejection;
use core_broker::cipher::CipherError;
use core_broker::errors::ErrorClass;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("authentication required")]
    AuthRequired,
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("site {0:?} not found")]
    SiteNotFound(String),
    #[error("credential {0:?} not found")]
    CredentialNotFound(String),
    #[error("cluster {0:?} not found")]
    ClusterNotFound(String),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("internal server error")]
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::AuthRequired => (StatusCode::FORBIDDEN, self.to_string()),
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::SiteNotFound(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::CredentialNotFound(_) | Self::ClusterNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Self::Rejected(ref rejection) => (StatusCode::BAD_REQUEST, rejection.to_string()),
            Self::Cipher(ref error) => {
                let status = match error.class() {
                    ErrorClass::Client => StatusCode::BAD_REQUEST,
                    ErrorClass::Server => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    // Keep wrong-key and format-compatibility failures
                    // apart in the logs; the variant carries which.
                    tracing::error!("[gateway] cipher failure: {:?}", error);
                }
                (status, error.to_string())
            }
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        let body = Json(json!({"code": status.as_u16(), "message": message}));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(_source: anyhow::Error) -> Self {
        tracing::error!("{:?}", _source);
        AppError::InternalServerError
    }
}
