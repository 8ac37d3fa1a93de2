//! File administration handlers: delete and rename.

use axum::extract::{FromRequest, Path, Request, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use shutterdrop_common::display_name;

use crate::error::ApiError;
use crate::handlers::{require_credentials, require_field};
use crate::state::AppState;

/// JSON body of a rename request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub event: Option<String>,
    pub photographer: Option<String>,
    pub date: Option<String>,
    pub original_name: Option<String>,
}

/// Response payload for a successful delete.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// Response payload for a successful rename.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameResponse {
    pub message: &'static str,
    pub new_name: String,
}

/// Delete a file by identifier.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let creds = require_credentials(&state, "Unauthorized").await?;

    state
        .drive
        .delete_file(&creds, &file_id)
        .await
        .map_err(|e| ApiError::upstream("Failed to delete file", e))?;

    tracing::info!(file_id = %file_id, "Deleted file");

    Ok(Json(DeleteResponse {
        message: "File deleted successfully",
    }))
}

/// Rename a file to the display name recomputed from its metadata.
///
/// The event field is accepted but a changed event does not move the
/// file between folders; only the display name is rewritten.
pub async fn rename_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    request: Request,
) -> Result<Json<RenameResponse>, ApiError> {
    let creds = require_credentials(&state, "Unauthorized").await?;

    // Read only after the login check; a missing or non-JSON body
    // counts as empty.
    let body = Json::<RenameRequest>::from_request(request, &())
        .await
        .map(|Json(body)| body)
        .unwrap_or_default();

    let photographer = require_field(body.photographer, "photographer")?;
    let date = require_field(body.date, "date")?;
    let original_name = require_field(body.original_name, "originalName")?;

    if let Some(event) = body.event {
        tracing::debug!(event = %event, "Rename leaves the file in its current folder");
    }

    let new_name = display_name(&date, &photographer, &original_name);

    let renamed = state
        .drive
        .rename_file(&creds, &file_id, &new_name)
        .await
        .map_err(|e| ApiError::upstream("Failed to update file", e))?;

    tracing::info!(file_id = %file_id, new_name = %renamed.name, "Renamed file");

    Ok(Json(RenameResponse {
        message: "File updated successfully",
        new_name: renamed.name,
    }))
}
