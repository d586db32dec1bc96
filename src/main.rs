// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use storefront_catalog::config::Config;
use storefront_catalog::store::{MemoryProductStore, PgProductStore, ProductStore};
use storefront_catalog::{database, routes, state::AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    let store: Arc<dyn ProductStore> = match &config.database_url {
        Some(url) => match database::create_pool(url, config.max_connections).await {
            Ok(pool) => Arc::new(PgProductStore::new(pool)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database pool");
                return;
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory product store");
            Arc::new(MemoryProductStore::new())
        }
    };

    let app = routes::build_app(AppState::new(store, config.jwt_secret.as_str()));

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", config.port, config.host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}
