//! Pokédex - browse PokéAPI from the terminal
//!
//! A terminal UI application that lists Pokémon page by page, with search,
//! type filtering and an offline cache.

use std::io;
use std::panic;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use pokedex::app::App;
use pokedex::cache::{CacheManager, FileStore, KeyValueStore, MemoryStore};
use pokedex::cli::{Cli, StartupConfig};
use pokedex::config::Config;
use pokedex::connectivity::{self, ConnectivityMonitor};
use pokedex::data::PokeApiClient;
use pokedex::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let mut config = Config::from_env();
    config.apply_startup(&startup);

    let log_path = logging::init(config.cache_dir.as_deref(), startup.log_level.as_deref());
    info!(?log_path, base_url = %config.base_url, "starting pokedex");

    let store: Arc<dyn KeyValueStore> = match &config.cache_dir {
        Some(dir) => Arc::new(FileStore::new(dir.clone())),
        None => {
            warn!("no cache directory available, caching in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let cache = Arc::new(CacheManager::new(store, config.cache_ttl));

    if startup.clear_cache {
        cache.clear().await?;
        info!("cache cleared");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let catalog = Arc::new(PokeApiClient::with_client(http.clone(), config.base_url.clone()));

    let monitor = if startup.force_offline {
        None
    } else {
        Some(ConnectivityMonitor::spawn(
            http,
            config.base_url.clone(),
            config.connectivity_interval,
        ))
    };
    let online = match &monitor {
        Some(monitor) => monitor.subscribe(),
        None => connectivity::fixed(false),
    };

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, catalog, cache, online).with_startup(&startup);

    // Initial render to show loading state
    terminal.draw(|f| ui::render(f, &app))?;

    app.load_initial().await;

    // Main event loop
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, &app))?;

        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    if let Some(monitor) = monitor {
        monitor.shutdown().await;
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("exiting");
    Ok(())
}
