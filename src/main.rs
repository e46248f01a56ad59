//! ticket-agent server binary.
//!
//! Loads configuration, installs logging, wires the store and model backend
//! into the orchestrator and serves the HTTP API until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ticket_agent::adapters::ai::ConfiguredModelBackend;
use ticket_agent::adapters::http::{app_router, AppState, RouterOptions};
use ticket_agent::adapters::store::{FileDocumentStore, InMemoryDocumentStore};
use ticket_agent::application::TicketOrchestrator;
use ticket_agent::config::{AppConfig, StoreBackend, StoreConfig};
use ticket_agent::ports::{DocumentStore, ModelBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let store = build_store(&config.store).await?;
    let model: Arc<dyn ModelBackend> = Arc::new(ConfiguredModelBackend::from_config(&config.ai)?);

    let provider = model.provider_info();
    info!(
        provider = %provider.name,
        model = %provider.model,
        store = ?config.store.backend,
        "Backends ready"
    );

    let orchestrator = Arc::new(TicketOrchestrator::new(
        store,
        model.clone(),
        config.prompt.limits(),
    ));
    let app = app_router(
        AppState::new(orchestrator, model),
        &RouterOptions::from_server_config(&config.server),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, Box<dyn Error>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::File => {
            let store = FileDocumentStore::open(&config.data_dir).await?;
            info!(path = %store.snapshot_path().display(), "Using file document store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
