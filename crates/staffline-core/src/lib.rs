//! Domain layer for Staffline.
//!
//! Holds the pieces of the client that do not touch the network or the file
//! system directly: storage scopes, the session store, the local edit
//! overlay, the API gateway traits, configuration and validation.

pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod overlay;
pub mod scope;
pub mod session;
pub mod validation;

// Re-export common error type
pub use error::{Result, StafflineError};
