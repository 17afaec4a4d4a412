mod config;
mod documents;
mod errors;
mod model_client;
mod routes;
mod rules;
mod session;
mod simplifier;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::model_client::ModelClient;
use crate::routes::build_router;
use crate::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sudarshan API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let model = ModelClient::new(config.model_endpoint(), config.model_api_token.clone())?;
    info!("Model client initialized (endpoint: {})", model.endpoint());

    // Initialize session store
    let sessions = build_session_store(&config).await?;

    let state = AppState {
        generator: Arc::new(model),
        sessions,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the web front end has a fixed host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when `REDIS_URL` is configured, process memory otherwise.
async fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisSessionStore::connect(url, config.session_ttl_secs).await?;
            Ok(Arc::new(store))
        }
        None => {
            info!("REDIS_URL not set; sessions are kept in memory");
            Ok(Arc::new(InMemorySessionStore::new(config.session_ttl_secs)))
        }
    }
}
