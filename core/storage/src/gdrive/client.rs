//! Google Drive API client.

use bytes::Bytes;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

use shutterdrop_common::{Error, Result};

/// Google Drive API base URL.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
/// Google Drive upload API base URL.
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// MIME type Drive assigns to folders.
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Fields requested back from file mutations.
const FILE_FIELDS: &str = "id,name,webViewLink,thumbnailLink";

/// Multipart boundary for uploads.
const UPLOAD_BOUNDARY: &str = "ShutterDropBoundary";

/// Google Drive file metadata from API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// Browser view link (absent on folders).
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Thumbnail link, when Drive has generated one.
    #[serde(default)]
    pub thumbnail_link: Option<String>,
}

/// Response from listing files.
#[derive(Debug, Deserialize)]
struct FileListResponse {
    files: Vec<DriveFile>,
}

/// Build the lookup query for an event folder under a parent.
fn folder_query(name: &str, parent_id: &str) -> String {
    format!(
        "mimeType = '{}' and name = '{}' and '{}' in parents and trashed = false",
        FOLDER_MIME_TYPE,
        name.replace('\'', "\\'"),
        parent_id
    )
}

/// Assemble a multipart/related upload body: metadata part, then content.
fn multipart_body(metadata_json: &str, mime_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata_json.len() + data.len() + 256);

    // Metadata part
    body.extend_from_slice(format!("--{}\r\n", UPLOAD_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata_json.as_bytes());
    body.extend_from_slice(b"\r\n");

    // Data part
    body.extend_from_slice(format!("--{}\r\n", UPLOAD_BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    // End boundary
    body.extend_from_slice(format!("--{}--", UPLOAD_BOUNDARY).as_bytes());

    body
}

fn bearer(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Google Drive API client.
///
/// Holds no credential state; every call carries the access token of
/// the identity it acts as.
pub struct DriveClient {
    http: Client,
}

impl DriveClient {
    /// Create a new Drive client.
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("ShutterDrop/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// Find a non-trashed folder by exact name directly under a parent.
    pub async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<DriveFile>> {
        let url = format!("{}/files", DRIVE_API_BASE);
        let query = folder_query(name, parent_id);

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to find folder: {}", e)))?;

        let list: FileListResponse = self.handle_response(response).await?;
        Ok(list.files.into_iter().next())
    }

    /// Create a folder under a parent.
    pub async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<DriveFile> {
        let url = format!("{}/files", DRIVE_API_BASE);

        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id]
        });

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .query(&[("fields", "id,name")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to create folder: {}", e)))?;

        self.handle_response(response).await
    }

    /// Upload a file from an in-memory buffer.
    pub async fn upload_file(
        &self,
        access_token: &str,
        folder_id: &str,
        name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> Result<DriveFile> {
        let url = format!("{}/files?uploadType=multipart", DRIVE_UPLOAD_BASE);

        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id]
        });

        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| Error::Serialization(format!("Failed to serialize metadata: {}", e)))?;

        let body = multipart_body(&metadata_json, mime_type, &data);

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", UPLOAD_BOUNDARY),
            )
            .query(&[("fields", FILE_FIELDS)])
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to upload file: {}", e)))?;

        self.handle_response(response).await
    }

    /// Rename a file in place.
    pub async fn rename_file(
        &self,
        access_token: &str,
        file_id: &str,
        new_name: &str,
    ) -> Result<DriveFile> {
        let url = format!("{}/files/{}", DRIVE_API_BASE, file_id);

        let metadata = serde_json::json!({ "name": new_name });

        let response = self
            .http
            .patch(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .query(&[("fields", FILE_FIELDS)])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to rename file: {}", e)))?;

        self.handle_response(response).await
    }

    /// Delete a file.
    pub async fn delete_file(&self, access_token: &str, file_id: &str) -> Result<()> {
        let url = format!("{}/files/{}", DRIVE_API_BASE, file_id);

        let response = self
            .http
            .delete(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to delete file: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::status_error(status, body))
        }
    }

    /// Handle API response with error checking.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Network(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::status_error(status, body))
        }
    }

    fn status_error(status: StatusCode, body: String) -> Error {
        match status {
            StatusCode::NOT_FOUND => Error::NotFound("Resource not found".to_string()),
            StatusCode::UNAUTHORIZED => {
                Error::Authentication("Invalid or expired token".to_string())
            }
            StatusCode::FORBIDDEN => Error::PermissionDenied("Access denied".to_string()),
            _ => Error::Network(format!("API error: {} - {}", status, body)),
        }
    }
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}
