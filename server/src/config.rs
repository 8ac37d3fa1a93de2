//! Environment-sourced server configuration.

use shutterdrop_common::{Error, Result};
use shutterdrop_storage::AuthConfig;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Root Drive folder holding all event folders.
    pub root_folder_id: String,
    /// OAuth2 callback URL registered with the provider.
    pub redirect_url: String,
    /// Front-end base URL the callback redirects to.
    pub frontend_url: String,
    /// Listen address.
    pub addr: String,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// # Errors
    /// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, or
    ///   `GOOGLE_DRIVE_FOLDER_ID` is not set
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require("GOOGLE_CLIENT_ID")?,
            client_secret: require("GOOGLE_CLIENT_SECRET")?,
            root_folder_id: require("GOOGLE_DRIVE_FOLDER_ID")?,
            redirect_url: std::env::var("SHUTTERDROP_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3001/api/auth/google/callback".into()),
            frontend_url: std::env::var("SHUTTERDROP_FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            addr: std::env::var("SHUTTERDROP_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into()),
        })
    }

    /// OAuth2 client registration view of this configuration.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.redirect_url.clone(),
        }
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::Configuration(format!("{} is not set", key)))
}
