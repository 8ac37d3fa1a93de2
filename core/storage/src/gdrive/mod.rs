//! Google Drive backing for ShutterDrop.
//!
//! This module provides the production identity and storage boundary:
//! - OAuth2 authorization-code flow against Google
//! - A thin REST client over the Drive v3 files API
//! - Gateway implementation wiring the client into the capability traits

pub mod auth;
pub mod client;
pub mod provider;

pub use auth::{AuthConfig, GoogleIdentity};
pub use client::DriveClient;
pub use provider::GoogleDrive;
