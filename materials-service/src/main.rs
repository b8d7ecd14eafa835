use anyhow::Result;
use shared::observability::{init_logging, LogConfig};
use std::{net::SocketAddr, sync::Arc};

mod config;
mod db;
mod handlers;
mod models;
mod routes;
mod storage;
mod supabase;

#[cfg(test)]
mod testing;

use config::{Config, MaterialsConfig};
use db::{MaterialRepository, PostgrestRepository};
use storage::{ObjectStorage, SupabaseStorage};
use supabase::SupabaseClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub repository: Arc<dyn MaterialRepository>,
    pub settings: Arc<MaterialsConfig>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(LogConfig {
        level: config.logging.level,
        format: config.logging.format,
        service_name: "materials-service".to_string(),
        ..Default::default()
    })?;

    tracing::info!("Starting Materials Service...");
    config.validate()?;

    let client = SupabaseClient::new(&config.supabase)?;
    tracing::info!("Supabase client initialized for {}", config.supabase.url);

    let state = AppState {
        storage: Arc::new(SupabaseStorage::new(client.clone(), &config.supabase.bucket)),
        repository: Arc::new(PostgrestRepository::new(client, &config.supabase.table)),
        settings: Arc::new(config.materials.clone()),
    };

    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Materials Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Materials Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
