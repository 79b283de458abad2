//! Command-line interface for katafind
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Mode selection (interactive vs one-shot query)

pub mod completion;

use clap::{Parser, Subcommand};
use nu_ansi_term::Color;
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat};
use crate::error::{ConfigError, Result};
use crate::formatter::Formatter;
use crate::server::CatalogClient;

/// Kata catalog quick search - find katas and topics as you type
#[derive(Parser, Debug)]
#[command(
    name = "katafind",
    version,
    about = "Terminal quick-search client for a kata catalog server",
    long_about = "An interactive terminal search client for a kata catalog server.
Type to get title and topic suggestions, navigate with the arrow keys,
and press Enter to open the selected catalog page in your browser."
)]
pub struct CliArgs {
    /// Catalog server base URL
    ///
    /// Example: katafind https://katas.example.org
    #[arg(value_name = "URL")]
    pub server: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format for one-shot queries (plain, json, json-pretty, table)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable mouse capture in the interactive session
    #[arg(long = "no-mouse")]
    pub no_mouse: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Minimum query length before suggestions are requested
    #[arg(long = "min-query-len", value_name = "N")]
    pub min_query_len: Option<usize>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for katafind
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Run a single suggestion query and print the result
    Query {
        /// Query text
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Create a CLI interface from pre-parsed arguments
    ///
    /// # Arguments
    /// * `args` - Parsed command-line arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        Self::apply_args_to_config(&mut config, args)?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
            Self::apply_args_to_config(&mut config, args)?;
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI arguments to override config values
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(server) = &args.server {
            config.server.base_url = server.clone();
        }
        if let Some(timeout) = args.timeout {
            config.server.timeout_secs = timeout;
        }
        if let Some(min_query_len) = args.min_query_len {
            config.server.min_query_len = min_query_len;
        }
        if let Some(format) = &args.format {
            config.display.format =
                OutputFormat::parse(format).ok_or_else(|| ConfigError::InvalidValue {
                    field: "format".to_string(),
                    value: format.clone(),
                })?;
        }
        if args.no_color {
            config.display.color_output = false;
        }
        Ok(())
    }

    /// Get command-line arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the explicit config file path, if one was given
    pub fn config_path(&self) -> Option<&Path> {
        self.args.config_file.as_deref()
    }

    /// Handle subcommands that short-circuit the interactive session
    ///
    /// # Returns
    /// * `Result<bool>` - True when a subcommand was handled and the
    ///   application should exit
    pub async fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            None => Ok(false),
            Some(Commands::Version) => {
                println!("katafind {}", env!("CARGO_PKG_VERSION"));
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Query { text }) => {
                self.run_query(text).await?;
                Ok(true)
            }
        }
    }

    /// Handle the `config` subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.config.validate()?;
            println!("Configuration is valid.");
        }
        if show || !validate {
            let rendered = toml::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
            print!("{rendered}");
        }
        Ok(())
    }

    /// Run a one-shot suggestion query
    ///
    /// # Arguments
    /// * `text` - Query text
    async fn run_query(&self, text: &str) -> Result<()> {
        let client = CatalogClient::new(&self.config.server)?;
        let response = client.autocomplete(text).await?;
        let formatter = Formatter::from_config(&self.config.display);
        println!("{}", formatter.format(text, &response, &client)?);
        Ok(())
    }

    /// Print startup banner unless in quiet mode
    pub fn print_banner(&self) {
        if self.args.quiet {
            return;
        }
        let title = format!("katafind {}", env!("CARGO_PKG_VERSION"));
        if self.config.display.color_output {
            println!("{}", Color::Cyan.bold().paint(title));
        } else {
            println!("{title}");
        }
        println!("Server: {}", self.config.server.base_url);
        println!("Type to search, arrows to select, Enter to open, Esc to quit.");
    }

    /// Print a warning about an unreachable server unless in quiet mode
    ///
    /// # Arguments
    /// * `error` - The ping failure
    pub fn print_unreachable(&self, error: &crate::error::KatafindError) {
        if self.args.quiet {
            return;
        }
        eprintln!(
            "Warning: catalog server {} is not responding ({})",
            self.config.server.base_url, error
        );
    }
}
