//! Kata Catalog Quick Search Library
//!
//! This library provides the core functionality for katafind, a terminal
//! quick-search client for a kata catalog server. It can be used as a
//! standalone library to build catalog search tools.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting for one-shot queries
//! - `history`: Search history persistence
//! - `server`: Catalog server HTTP client
//! - `suggest`: Suggestion engine, providers and dropdown model
//! - `ui`: Interactive terminal session
//!
//! # Example
//!
//! ```no_run
//! use katafind::config::ServerConfig;
//! use katafind::server::CatalogClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         base_url: "https://katas.example.org".to_string(),
//!         ..ServerConfig::default()
//!     };
//!     let client = CatalogClient::new(&config)?;
//!
//!     let suggestions = client.autocomplete("sort").await?;
//!     println!("{} title matches", suggestions.titles.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod history;
pub mod server;
pub mod suggest;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{KatafindError, Result};
pub use formatter::Formatter;
pub use history::SearchHistory;
pub use server::{CatalogClient, SuggestionResponse, TitleHit};
pub use suggest::{Dropdown, SuggestEngine, SuggestionProvider};
pub use ui::{SearchSession, SessionOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
