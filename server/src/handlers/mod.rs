//! HTTP request handlers.

pub mod auth;
pub mod files;
pub mod upload;

use shutterdrop_storage::Credentials;

use crate::error::ApiError;
use crate::state::AppState;

/// Snapshot the live credential set or reject with the route's 401
/// message. The snapshot is used for every gateway call the request
/// makes, so a re-authentication landing mid-request has no effect on
/// it.
pub(crate) async fn require_credentials(
    state: &AppState,
    message: &'static str,
) -> Result<Credentials, ApiError> {
    let creds = state
        .credentials
        .snapshot()
        .await
        .ok_or(ApiError::Unauthorized(message))?;

    if creds.is_expired() {
        tracing::warn!("Access token is expired; upstream calls are expected to fail");
    }

    Ok(creds)
}

/// Reject with a 400 naming the field when a required value is absent.
pub(crate) fn require_field(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", name)))
}
