//! HTTP surface of the ShutterDrop API.
//!
//! The server exposes the OAuth2 flow and the Drive-backed file
//! operations under the `/api` prefix. All state lives in [`AppState`];
//! the router itself is stateless and cloneable.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

/// Upload requests carry whole batches of full-resolution photos.
const MAX_BODY_BYTES: usize = 1024 * 1024 * 1024;

/// HTTP server for the ShutterDrop API.
pub struct Server {
    router: Router,
}

impl Server {
    /// Create a new server over the given application state.
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the axum [`Router`] for the API.
    fn build_router(state: AppState) -> Router {
        let api = Router::new()
            .route("/auth/google", get(handlers::auth::begin_auth))
            .route("/auth/google/callback", get(handlers::auth::complete_auth))
            .route("/upload", post(handlers::upload::upload))
            .route("/files/:file_id", put(handlers::files::rename_file))
            .route("/files/:file_id", delete(handlers::files::delete_file));

        Router::new()
            .nest("/api", api)
            // The front-end is served from a different origin.
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .with_state(state)
    }

    /// Return the inner [`Router`] (useful for testing with `tower::ServiceExt`).
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve the API on the given TCP address.
    pub async fn serve(self, addr: &str) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}
