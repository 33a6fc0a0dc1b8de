//! Warden API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use tracing::info;
use warden_core::AppError;

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_services::{build_app_state, connect_and_migrate, open_storage};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        let StorageBackend::Postgres { database_url } = &config.storage else {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        };

        connect_and_migrate(database_url).await?;
        info!("database migrations applied");
        return Ok(());
    }

    let storage = open_storage(&config.storage).await?;
    let app_state = build_app_state(storage, &config)?;
    let app = api_router::build_router(
        app_state,
        config.frontend_url.as_str(),
        config.exposes_internal_errors(),
    )?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "warden-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
