//! Capability traits for the identity provider and the Drive gateway.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use shutterdrop_common::Result;

use crate::credentials::Credentials;

/// Profile of the authenticated account, as reported by the identity
/// provider's userinfo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned account identifier.
    pub id: String,
    /// Account email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// A folder as seen by the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFolder {
    /// Backend-assigned folder identifier.
    pub id: String,
    /// Folder display name.
    pub name: String,
}

/// A file as seen by the storage backend.
///
/// Absent links stay absent in JSON output, mirroring what the backend
/// itself returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Backend-assigned file identifier.
    pub id: String,
    /// File display name.
    pub name: String,
    /// Browser link to view the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    /// Link to a thumbnail rendition, when the backend has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

/// One file to be created in a destination folder.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Identifier of the destination folder.
    pub folder_id: String,
    /// Display name the file is created under.
    pub name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Complete file content.
    pub content: Bytes,
}

/// OAuth2 identity provider boundary.
///
/// Implementations own the provider endpoints and client registration;
/// callers only see the three steps of the authorization-code flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the authorization URL the user is redirected to.
    fn authorization_url(&self) -> String;

    /// Exchange an authorization code for a credential set.
    ///
    /// # Errors
    /// - Invalid or expired authorization code
    /// - Network errors
    async fn exchange_code(&self, code: &str) -> Result<Credentials>;

    /// Fetch the authenticated account's profile.
    async fn fetch_profile(&self, creds: &Credentials) -> Result<UserProfile>;
}

/// Remote storage backend boundary.
///
/// Every call carries the credential set explicitly; implementations
/// hold no per-account state of their own.
#[async_trait]
pub trait DriveGateway: Send + Sync {
    /// Get the gateway name (e.g., "gdrive", "memory").
    fn name(&self) -> &str;

    /// Find a non-trashed folder by exact name directly under a parent.
    ///
    /// # Postconditions
    /// - Returns `None` when no such folder exists
    async fn find_folder(
        &self,
        creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<RemoteFolder>>;

    /// Create a folder under a parent.
    ///
    /// No uniqueness check is made; calling this twice with the same
    /// name creates two folders.
    async fn create_folder(
        &self,
        creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<RemoteFolder>;

    /// Create a file from an in-memory buffer.
    ///
    /// # Postconditions
    /// - Returns the created file's identifier, name, and view links
    async fn create_file(&self, creds: &Credentials, upload: FileUpload) -> Result<RemoteFile>;

    /// Rename a file in place. The file's parent folder is unchanged.
    async fn rename_file(
        &self,
        creds: &Credentials,
        file_id: &str,
        new_name: &str,
    ) -> Result<RemoteFile>;

    /// Delete a file by identifier.
    ///
    /// # Errors
    /// - File not found
    /// - Network/authentication errors
    async fn delete_file(&self, creds: &Credentials, file_id: &str) -> Result<()>;
}
