//! Tempo server entry point.
//!
//! Wires the store, rules oracle, event bus, and coordinator together,
//! spawns the opponent failure drain, then serves HTTP until the
//! process is terminated.

use std::sync::Arc;

use tempo_engine::{EventBus, MoveCoordinator, OpponentConfig};
use tempo_rules::StandardRules;
use tempo_server::{start_server, AppState, ServerConfig};
use tempo_store::{MemoryStore, RedisStore, SessionStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Initializes logging, loads configuration, selects the store backend,
/// builds the engine, and runs the HTTP server indefinitely.
///
/// # Errors
///
/// Returns an error if initialization or serving fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("tempo-server starting");

    // Load configuration (tempo.yaml if present, defaults otherwise)
    let config = ServerConfig::load()?;
    info!(
        host = config.host,
        port = config.port,
        opponent_delay_ms = config.opponent_delay_ms,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // Select the session store backend
    let store: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url).await?;
            info!(url, "redis session store connected");
            Arc::new(store)
        }
        None => {
            info!("no redis url configured, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Build the engine
    let bus = Arc::new(EventBus::new());
    let (coordinator, mut failures) = MoveCoordinator::new(
        store,
        Arc::new(StandardRules::new()),
        Arc::clone(&bus),
        OpponentConfig {
            delay: config.opponent_delay(),
        },
    );

    // Drain and log opponent reply failures
    tokio::spawn(async move {
        while let Some(failure) = failures.recv().await {
            warn!(room = %failure.room, error = %failure.error, "opponent reply failed");
        }
    });

    let state = Arc::new(AppState::new(Arc::new(coordinator), bus));
    start_server(&config, state).await?;

    Ok(())
}
