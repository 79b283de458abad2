//! Error handling module for katafind.
//!
//! This module provides error handling for catalog server interaction with:
//! - Structured error kinds for server, configuration and I/O failures
//! - A crate-wide [`Result`] alias
//! - Conversions from underlying library errors
//!
//! # Example
//!
//! ```rust,no_run
//! use katafind::error::{KatafindError, Result, ServerError};
//!
//! fn check_status(code: u16) -> Result<()> {
//!     if (200..300).contains(&code) {
//!         Ok(())
//!     } else {
//!         Err(KatafindError::Server(ServerError::BadStatus(code)))
//!     }
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, KatafindError, Result, ServerError};
