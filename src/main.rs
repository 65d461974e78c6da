use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod errors;
mod extract;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::AppConfig;
use database::{connection::get_db_client, MongoStore, ScoreStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app_state = initialize_app_state(config).await?;
    let addr = app_state.config.bind_addr();

    let app = routes::build_router(app_state);
    start_server(app, &addr).await
}

async fn initialize_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let Some(database_url) = config.database_url.clone() else {
        tracing::warn!("⚠️ DATABASE_URL not set; scores live in memory and vanish on restart");
        return Ok(AppState::in_memory(config));
    };

    let (client, db) = get_db_client(&database_url, &config.database_name)
        .await
        .context("failed to connect to MongoDB")?;

    let store = MongoStore::new(client, db);
    store
        .ensure_indexes()
        .await
        .context("failed to create MongoDB indexes")?;

    let store: Arc<dyn ScoreStore> = Arc::new(store);
    tracing::info!(
        doubles = config.lineup.doubles,
        singles = config.lineup.singles,
        "✅ MongoDB store ready"
    );
    Ok(AppState::new(store, config))
}

async fn start_server(app: axum::Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("🚀 Server starting on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
