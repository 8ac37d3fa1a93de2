//! In-memory identity and gateway doubles for testing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use shutterdrop_common::{Error, Result};

use crate::credentials::Credentials;
use crate::provider::{
    DriveGateway, FileUpload, IdentityProvider, RemoteFile, RemoteFolder, UserProfile,
};

/// In-memory folder record.
#[derive(Debug, Clone)]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
    pub parent_id: String,
}

/// In-memory file record.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Default)]
struct DriveState {
    folders: HashMap<String, FolderEntry>,
    files: HashMap<String, FileEntry>,
    ops: Vec<String>,
}

/// In-memory gateway.
///
/// Useful for testing and development. All data is stored in memory and
/// lost on drop. Every call is appended to an operation log so tests
/// can assert exactly which upstream calls a handler issued. Folder
/// creation performs no uniqueness check, like the real backend.
pub struct MemoryDrive {
    state: RwLock<DriveState>,
    fail_uploads: AtomicBool,
}

impl MemoryDrive {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DriveState::default()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `create_file` call fail.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Insert a folder directly, bypassing the gateway surface.
    pub fn seed_folder(&self, name: &str, parent_id: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = FolderEntry {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        };
        self.state.write().unwrap().folders.insert(id.clone(), entry);
        id
    }

    /// Insert a file directly, bypassing the gateway surface.
    pub fn seed_file(&self, name: &str, folder_id: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = FileEntry {
            id: id.clone(),
            name: name.to_string(),
            folder_id: folder_id.to_string(),
            mime_type: "application/octet-stream".to_string(),
            size: 0,
        };
        self.state.write().unwrap().files.insert(id.clone(), entry);
        id
    }

    /// Snapshot of the operation log, in call order.
    pub fn operations(&self) -> Vec<String> {
        self.state.read().unwrap().ops.clone()
    }

    /// Number of folders currently stored.
    pub fn folder_count(&self) -> usize {
        self.state.read().unwrap().folders.len()
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.state.read().unwrap().files.len()
    }

    /// Look up a stored file by identifier.
    pub fn file(&self, file_id: &str) -> Option<FileEntry> {
        self.state.read().unwrap().files.get(file_id).cloned()
    }

    /// All folders with the given name, in arbitrary order.
    pub fn folders_named(&self, name: &str) -> Vec<FolderEntry> {
        self.state
            .read()
            .unwrap()
            .folders
            .values()
            .filter(|f| f.name == name)
            .cloned()
            .collect()
    }

    fn log(&self, op: String) {
        self.state.write().unwrap().ops.push(op);
    }
}

impl Default for MemoryDrive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriveGateway for MemoryDrive {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_folder(
        &self,
        _creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<RemoteFolder>> {
        self.log(format!("find_folder:{}", name));

        let state = self.state.read().unwrap();
        let found = state
            .folders
            .values()
            .find(|f| f.name == name && f.parent_id == parent_id)
            .map(|f| RemoteFolder {
                id: f.id.clone(),
                name: f.name.clone(),
            });

        Ok(found)
    }

    async fn create_folder(
        &self,
        _creds: &Credentials,
        name: &str,
        parent_id: &str,
    ) -> Result<RemoteFolder> {
        self.log(format!("create_folder:{}", name));

        let id = Uuid::new_v4().to_string();
        let entry = FolderEntry {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        };
        self.state.write().unwrap().folders.insert(id.clone(), entry);

        Ok(RemoteFolder {
            id,
            name: name.to_string(),
        })
    }

    async fn create_file(&self, _creds: &Credentials, upload: FileUpload) -> Result<RemoteFile> {
        self.log(format!("create_file:{}", upload.name));

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::Network("upload rejected".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let entry = FileEntry {
            id: id.clone(),
            name: upload.name.clone(),
            folder_id: upload.folder_id.clone(),
            mime_type: upload.mime_type.clone(),
            size: upload.content.len(),
        };
        self.state.write().unwrap().files.insert(id.clone(), entry);

        Ok(RemoteFile {
            id: id.clone(),
            name: upload.name,
            web_view_link: Some(format!("https://drive.example/view/{}", id)),
            thumbnail_link: Some(format!("https://drive.example/thumb/{}", id)),
        })
    }

    async fn rename_file(
        &self,
        _creds: &Credentials,
        file_id: &str,
        new_name: &str,
    ) -> Result<RemoteFile> {
        self.log(format!("rename_file:{}", file_id));

        let mut state = self.state.write().unwrap();
        let entry = state
            .files
            .get_mut(file_id)
            .ok_or_else(|| Error::NotFound(format!("File not found: {}", file_id)))?;

        entry.name = new_name.to_string();

        Ok(RemoteFile {
            id: entry.id.clone(),
            name: entry.name.clone(),
            web_view_link: Some(format!("https://drive.example/view/{}", entry.id)),
            thumbnail_link: None,
        })
    }

    async fn delete_file(&self, _creds: &Credentials, file_id: &str) -> Result<()> {
        self.log(format!("delete_file:{}", file_id));

        let mut state = self.state.write().unwrap();
        state
            .files
            .remove(file_id)
            .ok_or_else(|| Error::NotFound(format!("File not found: {}", file_id)))?;

        Ok(())
    }
}

/// Identity double vending a fixed profile.
///
/// Accepts exactly one authorization code and issues the same
/// credential set for it every time.
pub struct StaticIdentity {
    profile: UserProfile,
    accepts: String,
}

/// Access token issued by [`StaticIdentity`].
pub const MEMORY_ACCESS_TOKEN: &str = "memory-access-token";

impl StaticIdentity {
    /// Create an identity that accepts `code`.
    pub fn new(profile: UserProfile, code: &str) -> Self {
        Self {
            profile,
            accepts: code.to_string(),
        }
    }

    /// The credential set this identity issues.
    pub fn issued_credentials() -> Credentials {
        Credentials {
            access_token: MEMORY_ACCESS_TOKEN.to_string(),
            refresh_token: Some("memory-refresh-token".to_string()),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn authorization_url(&self) -> String {
        "https://auth.example/authorize?client_id=memory".to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        if code == self.accepts {
            Ok(Self::issued_credentials())
        } else {
            Err(Error::Authentication(format!(
                "Unknown authorization code: {}",
                code
            )))
        }
    }

    async fn fetch_profile(&self, _creds: &Credentials) -> Result<UserProfile> {
        Ok(self.profile.clone())
    }
}
