//! Application state management for the Pokédex
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between the list and detail views.

use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

use crate::cache::CacheManager;
use crate::cli::StartupConfig;
use crate::config::Config;
use crate::data::{Catalog, Pokemon, PokemonDetail};
use crate::filter::{FilterState, Projector};
use crate::pager::{PageLoadError, Pager};

/// Rows from the end of the visible list at which the next page is requested
const END_REACHED_THRESHOLD: usize = 3;

/// Maximum scroll offset for the detail view
const MAX_DETAIL_SCROLL: u16 = 100;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching the first page
    Loading,
    /// List view with search and type filter
    PokemonList,
    /// Detail view for the named Pokémon
    PokemonDetail(String),
}

/// Whether keystrokes go to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Progress of the detail screen's request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(PokemonDetail),
    Failed(String),
}

/// Async work requested by a key press, run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    LoadMore,
    Reload,
    LoadDetail(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of the selected row in the visible list
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Where keystrokes go on the list screen
    pub input_mode: InputMode,
    /// Known categories, in API order
    pub types: Vec<String>,
    /// Banner text for the last failed foreground load
    pub error_message: Option<String>,
    /// Detail screen content
    pub detail: Option<DetailState>,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: u16,
    pending: Option<PendingAction>,
    pager: Pager,
    projector: Projector,
    catalog: Arc<dyn Catalog>,
    connectivity: watch::Receiver<bool>,
}

impl App {
    /// Creates a new App in the loading state
    pub fn new(
        config: &Config,
        catalog: Arc<dyn Catalog>,
        cache: Arc<CacheManager>,
        connectivity: watch::Receiver<bool>,
    ) -> Self {
        Self {
            state: AppState::Loading,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            types: Vec::new(),
            error_message: None,
            detail: None,
            detail_scroll_offset: 0,
            pending: None,
            pager: Pager::new(config, Arc::clone(&catalog), cache, connectivity.clone()),
            projector: Projector::new(config.debounce),
            catalog,
            connectivity,
        }
    }

    /// Applies the search text and type filter given on the command line
    pub fn with_startup(mut self, startup: &StartupConfig) -> Self {
        let filter = FilterState {
            query: startup.initial_query.clone(),
            category: startup.initial_category.clone(),
        };
        self.projector = self.projector.with_filter(filter);
        self
    }

    /// Items that pass the current filter
    pub fn visible(&self) -> &[Pokemon] {
        self.projector.visible()
    }

    /// Every item loaded so far
    pub fn all_items(&self) -> &[Pokemon] {
        self.pager.items()
    }

    pub fn query(&self) -> &str {
        &self.projector.filter().query
    }

    pub fn category(&self) -> Option<&str> {
        self.projector.filter().category.as_deref()
    }

    pub fn is_offline(&self) -> bool {
        !*self.connectivity.borrow()
    }

    /// Whether a page load is running or about to run
    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
            || matches!(
                self.pending,
                Some(PendingAction::LoadMore) | Some(PendingAction::Reload)
            )
    }

    /// Whether the filtered list is about to change
    pub fn is_filtering(&self) -> bool {
        self.projector.is_pending()
    }

    pub fn selected_pokemon(&self) -> Option<&Pokemon> {
        self.visible().get(self.selected_index)
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Loads categories and the first page, then shows the list
    pub async fn load_initial(&mut self) {
        match self.pager.load_types().await {
            Ok(types) => self.types = types,
            Err(e) => error!(error = %e, "failed to load types"),
        }

        let result = self.pager.load_page(0).await;
        self.apply_page_result(result);
        self.state = AppState::PokemonList;
    }

    /// Runs the action requested by the last key press, if any
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };

        match action {
            PendingAction::LoadMore => {
                if let Some(result) = self.pager.handle_end_reached().await {
                    self.apply_page_result(result);
                }
            }
            PendingAction::Reload => {
                info!("reloading list");
                self.selected_index = 0;
                let result = self.pager.reload().await;
                // The list was replaced whatever the outcome
                self.projector.items_changed(self.pager.items());
                self.error_message = result.err().map(|e| e.to_string());
            }
            PendingAction::LoadDetail(name) => {
                self.load_detail(&name).await;
            }
        }
    }

    /// Fetches the detail record for `name`
    pub async fn load_detail(&mut self, name: &str) {
        self.detail = Some(DetailState::Loading);
        let state = match self.catalog.fetch_detail(name).await {
            Ok(detail) => DetailState::Loaded(detail),
            Err(e) => {
                error!(name, error = %e, "failed to load details");
                DetailState::Failed(format!("Could not load details for {}.", name))
            }
        };

        // Ignore the result if the user already left this screen
        if self.state == AppState::PokemonDetail(name.to_string()) {
            self.detail = Some(state);
        }
    }

    /// Applies finished filter recomputations; call once per UI tick
    pub fn tick(&mut self) {
        if self.projector.poll() {
            self.clamp_selection();
        }
    }

    /// Aborts background work
    pub fn shutdown(&mut self) {
        self.pager.shutdown();
    }

    fn apply_page_result(&mut self, result: Result<usize, PageLoadError>) {
        match result {
            Ok(appended) => {
                self.error_message = None;
                if appended > 0 {
                    self.projector.items_changed(self.pager.items());
                }
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection (loads more near the end)
    /// - `Enter`: Open the selected Pokémon
    /// - `/`: Edit the search text (`Esc`/`Enter` to stop editing)
    /// - `Left`/`h`, `Right`/`l`: Cycle the type filter, `0` clears it
    /// - `r`: Reload the list, or retry a failed detail load
    /// - `?`: Toggle help
    /// - `Esc`: Back from detail, quit from list
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state.clone() {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::PokemonList => match self.input_mode {
                InputMode::Search => self.handle_search_key(key_event),
                InputMode::Normal => self.handle_list_key(key_event),
            },
            AppState::PokemonDetail(name) => self.handle_detail_key(key_event, name),
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Enter => {
                if let Some(pokemon) = self.selected_pokemon() {
                    let name = pokemon.name.clone();
                    self.open_detail(name);
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cycle_category(true);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cycle_category(false);
            }
            KeyCode::Char('0') => {
                self.set_category(None);
            }
            KeyCode::Char('r') => {
                if !self.is_loading() {
                    self.pending = Some(PendingAction::Reload);
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                let mut query = self.query().to_string();
                if query.pop().is_some() {
                    self.set_query(query);
                }
            }
            KeyCode::Char(c) => {
                let mut query = self.query().to_string();
                query.push(c);
                self.set_query(query);
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent, name: String) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.close_detail();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_up();
            }
            KeyCode::Char('r') => {
                if matches!(self.detail, Some(DetailState::Failed(_))) {
                    self.detail = Some(DetailState::Loading);
                    self.pending = Some(PendingAction::LoadDetail(name));
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn open_detail(&mut self, name: String) {
        self.detail_scroll_offset = 0;
        self.detail = Some(DetailState::Loading);
        self.state = AppState::PokemonDetail(name.clone());
        self.pending = Some(PendingAction::LoadDetail(name));
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.detail_scroll_offset = 0;
        self.state = AppState::PokemonList;
        if matches!(self.pending, Some(PendingAction::LoadDetail(_))) {
            self.pending = None;
        }
    }

    fn set_query(&mut self, query: String) {
        self.selected_index = 0;
        self.projector.set_query(query, self.pager.items());
    }

    fn set_category(&mut self, category: Option<String>) {
        self.selected_index = 0;
        self.projector.set_category(category, self.pager.items());
    }

    /// Steps through "All" followed by every known type, wrapping around
    fn cycle_category(&mut self, forward: bool) {
        if self.types.is_empty() {
            return;
        }

        let slots = self.types.len() + 1;
        let current = self
            .category()
            .and_then(|c| self.types.iter().position(|t| t == c))
            .map_or(0, |i| i + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        let category = next.checked_sub(1).map(|i| self.types[i].clone());
        self.set_category(category);
    }

    /// Moves the selection up, stopping at the top
    fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Moves the selection down, requesting the next page near the end
    fn move_selection_down(&mut self) {
        let count = self.visible().len();
        if count > 0 && self.selected_index + 1 < count {
            self.selected_index += 1;
        }
        if self.selected_index + END_REACHED_THRESHOLD >= count {
            self.request_end_reached();
        }
    }

    fn request_end_reached(&mut self) {
        if self.is_loading() || self.projector.is_pending() || self.pending.is_some() {
            return;
        }
        if self.pager.items().is_empty() {
            return;
        }
        self.pending = Some(PendingAction::LoadMore);
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.detail_scroll_offset < MAX_DETAIL_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }
}
