//! Search and category filtering of the accumulated list
//!
//! [`project`] is the pure filter. [`Projector`] re-runs it after a quiet
//! window whenever the query, category or list changes, dropping superseded
//! recomputations.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::Pokemon;

/// Current search input and category selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub category: Option<String>,
}

/// Returns the items whose name contains `query` (case-insensitive) and, if
/// `category` is set, whose resolved types contain it. Source order is kept.
pub fn project(items: &[Pokemon], query: &str, category: Option<&str>) -> Vec<Pokemon> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| category.map_or(true, |c| p.has_type(c)))
        .cloned()
        .collect()
}

/// Single-slot delayed task
///
/// Scheduling aborts whatever is still pending, so only the most recent task
/// within the quiet window runs.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Runs `task` after the quiet window unless superseded first
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Debounced view of the accumulated list
///
/// Results come back over a channel and are applied by [`Projector::poll`],
/// which the UI loop calls every tick. Each result carries the generation it
/// was scheduled with; only the latest generation is applied.
pub struct Projector {
    filter: FilterState,
    visible: Vec<Pokemon>,
    generation: u64,
    debouncer: Debouncer,
    results_tx: mpsc::UnboundedSender<(u64, Vec<Pokemon>)>,
    results_rx: mpsc::UnboundedReceiver<(u64, Vec<Pokemon>)>,
}

impl Projector {
    pub fn new(quiet_window: Duration) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            filter: FilterState::default(),
            visible: Vec::new(),
            generation: 0,
            debouncer: Debouncer::new(quiet_window),
            results_tx,
            results_rx,
        }
    }

    /// Starts from `filter` instead of an empty one
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The last applied projection
    pub fn visible(&self) -> &[Pokemon] {
        &self.visible
    }

    /// Whether a recomputation is scheduled but not yet applied
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending() || !self.results_rx.is_empty()
    }

    pub fn set_query(&mut self, query: impl Into<String>, items: &[Pokemon]) {
        self.filter.query = query.into();
        self.schedule(items);
    }

    pub fn set_category(&mut self, category: Option<String>, items: &[Pokemon]) {
        self.filter.category = category;
        self.schedule(items);
    }

    pub fn items_changed(&mut self, items: &[Pokemon]) {
        self.schedule(items);
    }

    /// Applies the newest finished recomputation, if any
    ///
    /// Returns `true` when the visible list changed.
    pub fn poll(&mut self) -> bool {
        let mut updated = false;
        while let Ok((generation, visible)) = self.results_rx.try_recv() {
            if generation == self.generation {
                self.visible = visible;
                updated = true;
            }
        }
        updated
    }

    fn schedule(&mut self, items: &[Pokemon]) {
        self.generation += 1;
        let generation = self.generation;
        let snapshot = items.to_vec();
        let filter = self.filter.clone();
        let results_tx = self.results_tx.clone();

        self.debouncer.schedule(async move {
            let visible = project(&snapshot, &filter.query, filter.category.as_deref());
            // Receiver lives as long as the projector
            let _ = results_tx.send((generation, visible));
        });
    }
}
