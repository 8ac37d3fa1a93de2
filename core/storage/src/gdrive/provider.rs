//! Google Drive gateway implementation.

use async_trait::async_trait;

use shutterdrop_common::Result;

use crate::credentials::Credentials;
use crate::provider::{DriveGateway, FileUpload, RemoteFile, RemoteFolder};

use super::client::{DriveClient, DriveFile};

impl From<DriveFile> for RemoteFile {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            web_view_link: file.web_view_link,
            thumbnail_link: file.thumbnail_link,
        }
    }
}

impl From<DriveFile> for RemoteFolder {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

/// Google Drive gateway.
///
/// Thin mapping from the capability trait onto the REST client.
pub struct GoogleDrive {
    client: DriveClient,
}

impl GoogleDrive {
    /// Create a new gateway.
    pub fn new() -> Self {
        Self {
            client: DriveClient::new(),
        }
    }
}

impl Default for GoogleDrive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriveGateway for GoogleDrive {
    fn name(&self) -> &str {
        "gdrive"
    }

    async fn find_folder(
        &self,
        creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<RemoteFolder>> {
        let found = self
            .client
            .find_folder(&creds.access_token, name, parent_id)
            .await?;

        Ok(found.map(RemoteFolder::from))
    }

    async fn create_folder(
        &self,
        creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<RemoteFolder> {
        let folder = self
            .client
            .create_folder(&creds.access_token, name, parent_id)
            .await?;

        Ok(folder.into())
    }

    async fn create_file(&self, creds: &Credentials, upload: FileUpload) -> Result<RemoteFile> {
        let file = self
            .client
            .upload_file(
                &creds.access_token,
                &upload.folder_id,
                &upload.name,
                &upload.mime_type,
                upload.content,
            )
            .await?;

        Ok(file.into())
    }

    async fn rename_file(
        &self,
        creds: &Credentials,
        file_id: &str,
        new_name: &str,
    ) -> Result<RemoteFile> {
        let file = self
            .client
            .rename_file(&creds.access_token, file_id, new_name)
            .await?;

        Ok(file.into())
    }

    async fn delete_file(&self, creds: &Credentials, file_id: &str) -> Result<()> {
        self.client.delete_file(&creds.access_token, file_id).await
    }
}
