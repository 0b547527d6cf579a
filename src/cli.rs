//! Command-line interface parsing for the Pokédex
//!
//! This module handles parsing of CLI arguments using clap and folds them
//! into a `StartupConfig` applied to the application and its configuration.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Largest page PokéAPI serves comfortably in one request
pub const MAX_PAGE_SIZE: usize = 100;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// Page size outside 1..=100
    #[error("Invalid page size: {0}. Must be between 1 and 100")]
    InvalidPageSize(usize),

    /// Log level is not one of the tracing levels
    #[error("Invalid log level: '{0}'. Valid levels: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Pokédex - browse PokéAPI from the terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse, search and filter Pokémon from PokéAPI")]
#[command(version)]
pub struct Cli {
    /// Start in offline mode: serve cached pages only, never hit the network
    #[arg(long)]
    pub offline: bool,

    /// Pre-fill the search box
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Pre-select a type filter (e.g. fire, water)
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: Option<String>,

    /// Items per page (1-100)
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Directory for cached responses and the log file
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Remove cached responses before starting
    #[arg(long)]
    pub clear_cache: bool,

    /// Log verbosity written to pokedex.log (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupConfig {
    /// Never consult the network
    pub force_offline: bool,
    /// Initial search text
    pub initial_query: String,
    /// Initial type filter, lowercased
    pub initial_category: Option<String>,
    /// Page size override
    pub page_size: Option<usize>,
    /// Cache directory override
    pub cache_dir: Option<PathBuf>,
    /// Wipe the cache before loading
    pub clear_cache: bool,
    /// Log level override
    pub log_level: Option<String>,
}

/// Validates a page size argument.
pub fn parse_page_size(size: usize) -> Result<usize, CliError> {
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(CliError::InvalidPageSize(size))
    }
}

/// Validates a log level argument, returning it lowercased.
pub fn parse_log_level(level: &str) -> Result<String, CliError> {
    level
        .parse::<tracing::Level>()
        .map(|parsed| parsed.as_str().to_lowercase())
        .map_err(|_| CliError::InvalidLogLevel(level.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a page size or log level is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let page_size = cli.page_size.map(parse_page_size).transpose()?;
        let log_level = cli.log_level.as_deref().map(parse_log_level).transpose()?;

        let initial_category = cli
            .type_name
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        Ok(StartupConfig {
            force_offline: cli.offline,
            initial_query: cli.search.clone().unwrap_or_default(),
            initial_category,
            page_size,
            cache_dir: cli.cache_dir.clone(),
            clear_cache: cli.clear_cache,
            log_level,
        })
    }
}
