//! Incremental list pagination with stale-while-revalidate caching
//!
//! The pager accumulates pages of resolved items. A cached page is served
//! immediately and, when online, refreshed in a background task whose only
//! effect is a cache write. A page that is not cached is fetched from the API
//! when online and reported as an offline condition otherwise.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::data::{ApiError, Catalog, Pokemon};
use crate::fetch::fetch_page_with_details;

/// Cache key for the category list
pub const TYPES_CACHE_KEY: &str = "types";

/// Cache key for the page starting at `offset`
pub fn page_cache_key(offset: usize) -> String {
    format!("pokemons_{}", offset)
}

/// Failure of a foreground load
#[derive(Debug, Error)]
pub enum PageLoadError {
    /// No cached copy and no connectivity
    #[error("You are offline and no cached data is available.")]
    Offline,

    /// The API request failed
    #[error("Failed to load Pokémon: {0}")]
    Fetch(#[from] ApiError),
}

/// Drives pagination over the catalog
pub struct Pager {
    catalog: Arc<dyn Catalog>,
    cache: Arc<CacheManager>,
    connectivity: watch::Receiver<bool>,
    page_limit: usize,
    max_concurrent: usize,
    offset: usize,
    items: Vec<Pokemon>,
    loading: bool,
    background: JoinSet<()>,
}

impl Pager {
    pub fn new(
        config: &Config,
        catalog: Arc<dyn Catalog>,
        cache: Arc<CacheManager>,
        connectivity: watch::Receiver<bool>,
    ) -> Self {
        Self {
            catalog,
            cache,
            connectivity,
            page_limit: config.page_limit,
            max_concurrent: config.max_concurrent_fetches,
            offset: 0,
            items: Vec::new(),
            loading: false,
            background: JoinSet::new(),
        }
    }

    /// Items accumulated so far, in load order
    pub fn items(&self) -> &[Pokemon] {
        &self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_online(&self) -> bool {
        *self.connectivity.borrow()
    }

    /// Number of background refreshes that have not finished yet
    pub fn pending_refreshes(&mut self) -> usize {
        self.reap_background();
        self.background.len()
    }

    /// Loads the page at `offset` and appends it to the accumulated items
    ///
    /// Returns how many items were appended. The loading flag is set for the
    /// duration of the call and cleared on every exit path.
    pub async fn load_page(&mut self, offset: usize) -> Result<usize, PageLoadError> {
        self.loading = true;
        self.offset = offset;
        let result = self.load_page_inner(offset).await;
        self.loading = false;

        match &result {
            Ok(count) => info!(offset, count, "page loaded"),
            Err(e) => error!(offset, error = %e, "page load failed"),
        }
        result
    }

    async fn load_page_inner(&mut self, offset: usize) -> Result<usize, PageLoadError> {
        let key = page_cache_key(offset);

        if let Some(cached) = self.cache.get::<Vec<Pokemon>>(&key).await {
            let count = cached.len();
            self.items.extend(cached);
            if self.is_online() {
                self.spawn_background_refresh(offset);
            }
            return Ok(count);
        }

        if !self.is_online() {
            return Err(PageLoadError::Offline);
        }

        let fetched = fetch_page_with_details(
            self.catalog.as_ref(),
            self.page_limit,
            offset,
            self.max_concurrent,
        )
        .await?;

        let count = fetched.len();
        self.items.extend(fetched.iter().cloned());
        self.cache.set(&key, &fetched).await;
        Ok(count)
    }

    /// Advances to the next page unless a load is already in flight
    ///
    /// Returns `None` when the call was ignored. `load_page` holds `&mut self`
    /// for its whole duration, so the in-flight check here only covers
    /// callers sharing the pager; the app additionally refuses to queue a
    /// second request while one is pending (`App::request_end_reached`).
    pub async fn handle_end_reached(&mut self) -> Option<Result<usize, PageLoadError>> {
        if self.loading {
            return None;
        }
        let next = self.offset + self.page_limit;
        Some(self.load_page(next).await)
    }

    /// Drops every accumulated item and loads the first page again
    pub async fn reload(&mut self) -> Result<usize, PageLoadError> {
        self.items.clear();
        self.load_page(0).await
    }

    /// Loads the category list, from cache when fresh
    pub async fn load_types(&self) -> Result<Vec<String>, PageLoadError> {
        if let Some(cached) = self.cache.get::<Vec<String>>(TYPES_CACHE_KEY).await {
            return Ok(cached);
        }

        if !self.is_online() {
            return Err(PageLoadError::Offline);
        }

        let types = self.catalog.fetch_type_names().await?;
        self.cache.set(TYPES_CACHE_KEY, &types).await;
        Ok(types)
    }

    /// Refetches `offset` in the background and overwrites its cache entry
    ///
    /// Failures are logged and swallowed; the caller already shows a copy.
    fn spawn_background_refresh(&mut self, offset: usize) {
        self.reap_background();

        let catalog = Arc::clone(&self.catalog);
        let cache = Arc::clone(&self.cache);
        let limit = self.page_limit;
        let max_concurrent = self.max_concurrent;

        self.background.spawn(async move {
            let key = page_cache_key(offset);
            match fetch_page_with_details(catalog.as_ref(), limit, offset, max_concurrent).await {
                Ok(items) => {
                    cache.set(&key, &items).await;
                    debug!(offset, count = items.len(), "background refresh stored");
                }
                Err(e) => debug!(offset, error = %e, "background refresh failed"),
            }
        });
    }

    /// Waits for every background refresh to finish
    pub async fn wait_for_background(&mut self) {
        while self.background.join_next().await.is_some() {}
    }

    /// Aborts outstanding background refreshes
    pub fn shutdown(&mut self) {
        self.background.abort_all();
    }

    fn reap_background(&mut self) {
        while self.background.try_join_next().is_some() {}
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
