// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::orchestrator::SubmitError;
use crate::store::StoreError;

/// Errors surfaced at the HTTP boundary. Clients get a fixed message per
/// kind; detail goes to the log only.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("Failed to read stats: {0}")]
    Read(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "Invalid JSON"),
            ApiError::Submit(SubmitError::Validation(_)) => (StatusCode::BAD_REQUEST, "Bad Request"),
            ApiError::Submit(SubmitError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to add match data")
            }
            ApiError::Submit(SubmitError::AggregateUpdate { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update stats")
            }
            ApiError::Read(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get data from database"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "bad request");
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
