//! In-process fakes shared by unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::app::App;
use crate::cache::{CacheManager, MemoryStore};
use crate::config::Config;
use crate::connectivity;
use crate::data::{ApiError, Catalog, Pokemon, PokemonDetail, PokemonRef, Stat};

/// Catalog of `total` generated entries named `mon-<index>`
///
/// Records how many detail requests overlap so tests can check concurrency
/// bounds, and can be told to fail individual items or whole pages.
pub struct FakeCatalog {
    total: usize,
    delay: Duration,
    fail_pages: AtomicBool,
    failing_urls: Mutex<HashSet<String>>,
    slow_urls: Mutex<HashMap<String, Duration>>,
    timings: Mutex<Vec<(usize, Instant, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    page_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            delay: Duration::from_millis(5),
            fail_pages: AtomicBool::new(false),
            failing_urls: Mutex::new(HashSet::new()),
            slow_urls: Mutex::new(HashMap::new()),
            timings: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            page_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn url_for(index: usize) -> String {
        format!("https://example.test/pokemon/{}/", index)
    }

    pub fn reference(index: usize) -> PokemonRef {
        PokemonRef {
            name: format!("mon-{}", index),
            url: Self::url_for(index),
        }
    }

    /// Types the fake reports for entry `index`
    pub fn types_for(index: usize) -> Vec<String> {
        const TYPES: [&str; 3] = ["grass", "fire", "water"];
        vec![TYPES[index % TYPES.len()].to_string()]
    }

    pub fn fail_url(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_string());
    }

    /// Makes the detail request for `url` take `delay` instead of the default
    pub fn slow_url(&self, url: &str, delay: Duration) {
        self.slow_urls.lock().unwrap().insert(url.to_string(), delay);
    }

    /// `(index, started, finished)` for every completed detail request
    pub fn timings(&self) -> Vec<(usize, Instant, Instant)> {
        self.timings.lock().unwrap().clone()
    }

    pub fn set_fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn index_of(url: &str) -> Option<usize> {
        url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
    }

    fn failure(url: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<PokemonRef>, ApiError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(Self::failure("page"));
        }
        let end = (offset + limit).min(self.total);
        Ok((offset.min(end)..end).map(Self::reference).collect())
    }

    async fn fetch_types_of(&self, url: &str) -> Result<Vec<String>, ApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let started = Instant::now();

        let delay = self
            .slow_urls
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(self.delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(index) = Self::index_of(url) {
            self.timings
                .lock()
                .unwrap()
                .push((index, started, Instant::now()));
        }
        if self.failing_urls.lock().unwrap().contains(url) {
            return Err(Self::failure(url));
        }
        let index = Self::index_of(url).ok_or_else(|| Self::failure(url))?;
        Ok(Self::types_for(index))
    }

    async fn fetch_type_names(&self) -> Result<Vec<String>, ApiError> {
        tokio::time::sleep(self.delay).await;
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(Self::failure("type"));
        }
        Ok(vec!["grass".into(), "fire".into(), "water".into()])
    }

    async fn fetch_detail(&self, name: &str) -> Result<PokemonDetail, ApiError> {
        tokio::time::sleep(self.delay).await;
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(Self::failure(name));
        }
        Ok(PokemonDetail {
            name: name.to_string(),
            height: 7,
            weight: 69,
            abilities: vec!["overgrow".to_string()],
            stats: vec![Stat {
                name: "hp".to_string(),
                base_stat: 45,
            }],
            sprite_url: None,
            types: vec!["grass".to_string()],
        })
    }
}

/// Builds a resolved item for projection tests
pub fn pokemon(name: &str, types: &[&str]) -> Pokemon {
    Pokemon {
        name: name.to_string(),
        url: format!("https://example.test/pokemon/{}/", name),
        types: Some(types.iter().map(|t| t.to_string()).collect()),
    }
}

/// Builds an app over `catalog` with an in-memory cache
pub fn test_app_with(catalog: FakeCatalog, online: bool) -> App {
    let cache = Arc::new(CacheManager::new(
        Arc::new(MemoryStore::new()),
        Duration::from_secs(60 * 60),
    ));
    test_app_with_cache(catalog, cache, online)
}

/// Builds an app over `catalog` sharing `cache` with the caller
pub fn test_app_with_cache(catalog: FakeCatalog, cache: Arc<CacheManager>, online: bool) -> App {
    let config = Config {
        cache_dir: None,
        ..Config::default()
    };
    App::new(&config, Arc::new(catalog), cache, connectivity::fixed(online))
}

/// Lets the filter quiet window pass and applies the result
pub async fn settle(app: &mut App) {
    tokio::time::sleep(Duration::from_millis(301)).await;
    app.tick();
}

/// Online app over 100 fake entries with the first page loaded
pub async fn loaded_app() -> App {
    let mut app = test_app_with(FakeCatalog::new(100), true);
    app.load_initial().await;
    settle(&mut app).await;
    app
}
