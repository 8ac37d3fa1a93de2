//! Process-wide credential slot shared by all request handlers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// OAuth2 credential set with expiration tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access token for API requests.
    pub access_token: String,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Check if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        // Consider expired if less than 5 minutes remaining
        self.expires_at < Utc::now() + Duration::minutes(5)
    }
}

/// Holder of the most recently authenticated credential set.
///
/// Empty at startup, overwritten wholesale on each completed
/// authorization flow, never cleared. Handlers snapshot it once at
/// entry, so a re-authentication landing mid-request does not switch
/// the identity under in-flight gateway calls.
pub struct CredentialStore {
    slot: RwLock<Option<Credentials>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Replace the live credential set.
    pub async fn install(&self, creds: Credentials) {
        *self.slot.write().await = Some(creds);
    }

    /// Snapshot the live credential set, if any.
    pub async fn snapshot(&self) -> Option<Credentials> {
        self.slot.read().await.clone()
    }

    /// Check whether a credential set is installed.
    pub async fn is_authenticated(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
