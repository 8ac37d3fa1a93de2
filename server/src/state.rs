//! Shared application state.

use std::sync::Arc;

use shutterdrop_storage::{CredentialStore, DriveGateway, IdentityProvider};

use crate::config::ServerConfig;

/// Application state for the API server.
///
/// Contains shared state that needs to be accessible to all request
/// handlers: the configuration, the identity and storage boundaries,
/// and the process-wide credential holder.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub drive: Arc<dyn DriveGateway>,
    pub credentials: Arc<CredentialStore>,
}

impl AppState {
    /// Assemble the state with an empty credential holder.
    pub fn new(
        config: ServerConfig,
        identity: Arc<dyn IdentityProvider>,
        drive: Arc<dyn DriveGateway>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            drive,
            credentials: Arc::new(CredentialStore::new()),
        }
    }
}
