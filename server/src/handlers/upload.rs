//! Multi-file upload handler.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::Json;
use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;

use shutterdrop_common::{display_name, Error};
use shutterdrop_storage::{Credentials, FileUpload, RemoteFile, RemoteFolder};

use crate::error::ApiError;
use crate::handlers::{require_credentials, require_field};
use crate::state::AppState;

/// Maximum number of files accepted in one request.
const MAX_FILES: usize = 50;
/// Multipart field name carrying the binary parts.
const FILE_FIELD: &str = "imageFiles";

/// One parsed file part.
struct ParsedFile {
    original_name: String,
    mime_type: String,
    content: Bytes,
}

#[derive(Default)]
struct UploadRequest {
    files: Vec<ParsedFile>,
    event: Option<String>,
    photographer: Option<String>,
    date: Option<String>,
}

/// Response payload for a successful upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub files: Vec<RemoteFile>,
}

/// Accept up to [`MAX_FILES`] photos and file them into the event's
/// folder under the configured root.
///
/// The response is all-or-nothing: every file-creation call runs to
/// completion, and one failure fails the whole request even though the
/// calls that succeeded remain created remotely.
pub async fn upload(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let creds = require_credentials(&state, "Unauthorized: Please log in first.").await?;

    // The body is read only after the login check; a request that is
    // not multipart carries no files.
    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|_| ApiError::BadRequest("No files uploaded.".to_string()))?;
    let request = parse_request(multipart).await?;

    if request.files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded.".to_string()));
    }

    let event = require_field(request.event, "event")?;
    let photographer = require_field(request.photographer, "photographer")?;
    let date = require_field(request.date, "date")?;

    let folder = resolve_event_folder(&state, &creds, &event)
        .await
        .map_err(|e| ApiError::upstream("Failed to upload files.", e))?;

    tracing::info!(
        event = %event,
        folder_id = %folder.id,
        count = request.files.len(),
        "Uploading files"
    );

    // One task per file; results are joined in spawn order, so the
    // response array matches call-issuance order.
    let tasks: Vec<_> = request
        .files
        .into_iter()
        .map(|file| {
            let drive = state.drive.clone();
            let creds = creds.clone();
            let upload = FileUpload {
                folder_id: folder.id.clone(),
                name: display_name(&date, &photographer, &file.original_name),
                mime_type: file.mime_type,
                content: file.content,
            };
            tokio::spawn(async move { drive.create_file(&creds, upload).await })
        })
        .collect();

    let outcomes = join_all(tasks).await;

    let total = outcomes.len();
    let mut files = Vec::with_capacity(total);
    let mut failed = 0usize;

    for outcome in outcomes {
        match outcome {
            Ok(Ok(file)) => files.push(file),
            Ok(Err(err)) => {
                failed += 1;
                tracing::error!(error = %err, "File upload failed");
            }
            Err(err) => {
                failed += 1;
                tracing::error!(error = %err, "Upload task failed");
            }
        }
    }

    if failed > 0 {
        return Err(ApiError::upstream(
            "Failed to upload files.",
            Error::Network(format!("{} of {} uploads failed", failed, total)),
        ));
    }

    Ok(Json(UploadResponse {
        message: "All files uploaded successfully!",
        files,
    }))
}

/// Find the event folder under the configured root, creating it on
/// first use. Lookup-then-create is not transactional; two concurrent
/// first uploads for the same event can both create a folder.
async fn resolve_event_folder(
    state: &AppState,
    creds: &Credentials,
    event: &str,
) -> Result<RemoteFolder, Error> {
    let root = &state.config.root_folder_id;

    if let Some(folder) = state.drive.find_folder(creds, event, root).await? {
        return Ok(folder);
    }

    let folder = state.drive.create_folder(creds, event, root).await?;
    tracing::info!(event = %event, folder_id = %folder.id, "Created event folder");

    Ok(folder)
}

async fn parse_request(mut multipart: Multipart) -> Result<UploadRequest, ApiError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Malformed multipart payload: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        if let Some(original_name) = file_name {
            if field_name != FILE_FIELD {
                return Err(ApiError::BadRequest(format!(
                    "Unexpected file field: {}",
                    field_name
                )));
            }
            if request.files.len() == MAX_FILES {
                return Err(ApiError::BadRequest(format!(
                    "Too many files: limit is {}",
                    MAX_FILES
                )));
            }

            let content = field.bytes().await.map_err(|e| {
                ApiError::BadRequest(format!("Failed to read file part: {}", e))
            })?;

            request.files.push(ParsedFile {
                original_name,
                mime_type: content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                content,
            });
        } else {
            let value = field.text().await.map_err(|e| {
                ApiError::BadRequest(format!("Failed to read field {}: {}", field_name, e))
            })?;

            match field_name.as_str() {
                "event" => request.event = Some(value),
                "photographer" => request.photographer = Some(value),
                "date" => request.date = Some(value),
                // Unknown text fields are ignored
                _ => {}
            }
        }
    }

    Ok(request)
}
