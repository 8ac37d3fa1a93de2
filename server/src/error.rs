//! API error surface and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use shutterdrop_common::Error;

/// Error surface of the API handlers.
///
/// Upstream failures carry the route's fixed public message next to
/// the source error; the detail is logged server-side and never sent
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// No live credential set.
    Unauthorized(&'static str),
    /// Missing or malformed request input.
    BadRequest(String),
    /// Identity provider or storage backend failure.
    Upstream {
        public: &'static str,
        source: Error,
    },
}

impl ApiError {
    /// Wrap an upstream failure with the route's public message.
    pub fn upstream(public: &'static str, source: Error) -> Self {
        Self::Upstream { public, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream { public, source } => {
                tracing::error!(error = %source, "{}", public);
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
