//! Kata Catalog Quick Search
//!
//! A terminal quick-search client for a kata catalog server.
//! Type into the search line to get title and topic suggestions from the
//! catalog, navigate them with the keyboard, and open the selected page
//! in your browser.
//!
//! # Features
//!
//! - As-you-type suggestions from the catalog's autocomplete endpoint
//! - Keyboard navigation with circular wraparound and mouse support
//! - One-shot query mode with plain, JSON and table output
//! - Configuration file and search history
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! katafind https://katas.example.org
//!
//! # One-shot query
//! katafind https://katas.example.org query "binary tree"
//! ```

use std::sync::Arc;
use tracing::Level;

mod cli;
mod config;
mod error;
mod formatter;
mod history;
mod server;
mod suggest;
mod ui;

use cli::CliInterface;
use error::Result;
use history::SearchHistory;
use server::CatalogClient;
use suggest::{RemoteSuggestionProvider, SuggestEngine};
use ui::{SearchSession, SessionOptions};

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize the application and handle any errors
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or start the interactive session
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    // Parse command-line arguments and load configuration
    let cli = CliInterface::new()?;

    // Initialize logging based on verbosity
    initialize_logging(&cli);

    // Handle subcommands (version, query, completion, config)
    if cli.handle_subcommand().await? {
        return Ok(());
    }

    // Print banner if not in quiet mode
    cli.print_banner();

    // Run in interactive mode
    run_interactive_mode(&cli).await
}

/// Run application in interactive search mode
async fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let client = CatalogClient::new(&cli.config().server)?;

    // The endpoint is an external collaborator; an unreachable server is
    // reported but does not prevent the session from starting
    if let Err(e) = client.ping().await {
        cli.print_unreachable(&e);
    }

    let provider = Arc::new(RemoteSuggestionProvider::new(client.clone()));
    let engine = SuggestEngine::new(provider, cli.config().server.min_query_len);
    let history = SearchHistory::load(cli.config().history.clone());

    let options = SessionOptions {
        prompt: "search> ".to_string(),
        color_enabled: cli.config().display.color_output,
        max_dropdown_rows: cli.config().display.max_dropdown_rows,
        mouse_enabled: !cli.args().no_mouse,
    };

    let mut session = SearchSession::new(engine, client, history, options);
    session.run().await?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
