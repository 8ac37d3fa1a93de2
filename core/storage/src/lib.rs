//! Storage and identity boundary for ShutterDrop.
//!
//! This module provides trait-based interfaces for the OAuth2 identity
//! provider and the remote Drive backend, the process-wide credential
//! holder, an in-memory implementation for tests, and the Google Drive
//! implementation.
//!
//! # Design Principles
//! - Provider isolation: No backend-specific logic above the traits
//! - Async operations: All I/O operations are async
//! - Explicit identity: Every gateway call carries its credential set
//! - Unified error semantics: Consistent error types across backends

pub mod credentials;
pub mod gdrive;
pub mod memory;
pub mod provider;

pub use credentials::{CredentialStore, Credentials};
pub use gdrive::{AuthConfig, GoogleDrive, GoogleIdentity};
pub use memory::{MemoryDrive, StaticIdentity};
pub use provider::{
    DriveGateway, FileUpload, IdentityProvider, RemoteFile, RemoteFolder, UserProfile,
};
