//! Bookshelf Server - library catalog gateway
//!
//! Serves authors, books and reviews from a remote catalog API, falling back
//! to local storage when the remote is absent or failing.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api,
    config::{AppConfig, StorageBackend},
    ids::IdGenerator,
    remote::HttpGateway,
    repository::{FileStore, KeyValueStore, MemoryStore, Repository},
    services::{notifier::ChangeNotifier, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookshelf_server={},tower_http=debug", config.logging.level).into()
    });
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    // Local storage backend
    let kv: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::open(&config.storage.path, config.storage.max_blob_bytes)
                .with_context(|| {
                    format!("Failed to open local storage at {}", config.storage.path.display())
                })?;
            tracing::info!("Local storage at {}", config.storage.path.display());
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory local storage, local records are lost on restart");
            Arc::new(match config.storage.max_blob_bytes {
                Some(quota) => MemoryStore::with_quota(quota),
                None => MemoryStore::new(),
            })
        }
    };

    // Remote catalog client
    let remote = HttpGateway::new(&config.remote).context("Failed to build remote catalog client")?;

    // Create repository and services
    let repository = Repository::new(kv, Arc::new(IdGenerator::new()));
    let notifier = ChangeNotifier::new(config.events.capacity);
    let services = Services::new(repository, Arc::new(remote), notifier);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", config.server.host))?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
