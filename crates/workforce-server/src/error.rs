// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-layer error type: every failure this crate can produce is named here
//! as one variant rather than propagated as an opaque `anyhow`-style error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("action queue full")]
    QueueFull,

    #[error("illegal status transition: {0}")]
    IllegalTransition(String),

    #[error("invalid request body: {0}")]
    BadRequest(String),
}

impl From<workforce_tasklock::IllegalTransition> for ApiError {
    fn from(err: workforce_tasklock::IllegalTransition) -> Self {
        ApiError::IllegalTransition(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::QueueFull => StatusCode::TOO_MANY_REQUESTS,
            ApiError::IllegalTransition(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
