//! Configuration Module
//!
//! Runtime settings. Defaults can be overridden from environment variables
//! and then from CLI flags.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::FileStore;
use crate::cli::{parse_page_size, StartupConfig};
use crate::data::client::POKEAPI_BASE_URL;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API root, without trailing slash
    pub base_url: String,
    /// Items per listing page
    pub page_limit: usize,
    /// Detail requests allowed in flight at once
    pub max_concurrent_fetches: usize,
    /// How long cache entries stay valid
    pub cache_ttl: Duration,
    /// Quiet window before the filtered list is recomputed
    pub debounce: Duration,
    /// How often the connectivity monitor probes the API
    pub connectivity_interval: Duration,
    /// Directory for cache entries and the log file
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: POKEAPI_BASE_URL.to_string(),
            page_limit: 20,
            max_concurrent_fetches: 5,
            cache_ttl: Duration::from_secs(60 * 60),
            debounce: Duration::from_millis(300),
            connectivity_interval: Duration::from_secs(10),
            cache_dir: FileStore::default_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `POKEDEX_BASE_URL` - API root (default: https://pokeapi.co/api/v2)
    /// - `POKEDEX_PAGE_LIMIT` - Items per page (default: 20)
    /// - `POKEDEX_MAX_CONCURRENT` - Concurrent detail requests (default: 5)
    /// - `POKEDEX_CACHE_TTL_SECS` - Cache lifetime in seconds (default: 3600)
    /// - `POKEDEX_DEBOUNCE_MS` - Filter quiet window in ms (default: 300)
    ///
    /// Unparseable or out-of-range values fall back to the defaults: the page
    /// limit must be within 1..=100 like `--page-size`, and the TTL non-zero.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            base_url: lookup("POKEDEX_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            page_limit: parse_var(&lookup, "POKEDEX_PAGE_LIMIT")
                .and_then(|n| parse_page_size(n).ok())
                .unwrap_or(defaults.page_limit),
            max_concurrent_fetches: parse_var(&lookup, "POKEDEX_MAX_CONCURRENT")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_concurrent_fetches),
            cache_ttl: parse_var(&lookup, "POKEDEX_CACHE_TTL_SECS")
                .filter(|&secs: &u64| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            debounce: parse_var(&lookup, "POKEDEX_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            connectivity_interval: defaults.connectivity_interval,
            cache_dir: defaults.cache_dir,
        }
    }

    /// Applies command-line overrides
    pub fn apply_startup(&mut self, startup: &StartupConfig) {
        if let Some(page_size) = startup.page_size {
            self.page_limit = page_size;
        }
        if let Some(dir) = &startup.cache_dir {
            self.cache_dir = Some(dir.clone());
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)?.trim().parse().ok()
}
