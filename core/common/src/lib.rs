//! Common utilities and types shared across ShutterDrop modules.
//!
//! This module provides the error taxonomy and the file naming rule that
//! every other crate in the workspace relies on.

pub mod error;
pub mod naming;

pub use error::{Error, Result};
pub use naming::display_name;
