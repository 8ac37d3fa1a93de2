//! ShutterDrop API server binary.
//!
//! Reads its configuration from the environment (a `.env` file is
//! honored), wires the Google identity and Drive gateways into the
//! application state, and serves the API until the process is stopped.

use std::sync::Arc;

use shutterdrop_server::{AppState, Server, ServerConfig};
use shutterdrop_storage::{GoogleDrive, GoogleIdentity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shutterdrop_server=info".parse()?)
                .add_directive("shutterdrop_storage=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let identity = Arc::new(GoogleIdentity::new(config.auth_config())?);
    let drive = Arc::new(GoogleDrive::new());

    let addr = config.addr.clone();
    tracing::info!("-- Starting ShutterDrop API on {}", addr);

    let state = AppState::new(config, identity, drive);
    Server::new(state).serve(&addr).await?;

    Ok(())
}
