// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod albums;
mod cache;
mod config;
mod errors;
mod extractor;
mod handlers;
mod image_processing;
mod imgur;
mod metadata;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;
mod token;
mod views;

use crate::cache::MokaCacheStore;
use crate::config::Config;
use crate::imgur::{ImageHost, ImgurClient};
use crate::metadata::MongoMetadataStore;
use crate::services::Gallery;
use crate::state::AppState;
use crate::token::TokenManager;

/// Upper bound on cached album listings.
const ALBUM_CACHE_CAPACITY: u64 = 256;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_site=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting portfolio server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // --- Document store ---
    let metadata_store = match MongoMetadataStore::connect(&config.mongo).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Could not connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    // --- Image host ---
    let host: Arc<dyn ImageHost> = match ImgurClient::new(&config.image_host) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Could not create image host client: {}", e);
            std::process::exit(1);
        }
    };
    let tokens = Arc::new(TokenManager::new(
        host.clone(),
        config.image_host.credentials.clone(),
    ));
    let cache = Arc::new(MokaCacheStore::new(ALBUM_CACHE_CAPACITY));
    let gallery = Arc::new(Gallery::new(host, cache, tokens.clone()));

    let port = config.port;
    let app_state = AppState {
        config: Arc::new(config),
        tokens,
        gallery,
        metadata_store: Arc::new(metadata_store),
    };
    let app = routes::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening for requests on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}
