use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{HealthResponse, StorageStatusResponse};
use crate::state::{AppState, StorageProbe};

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = check_storage(&state.storage).await;

    let ready = storage.status == "ok";
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: if ready { "ok" } else { "degraded" },
            ready,
            storage,
        }),
    )
}

async fn check_storage(storage: &StorageProbe) -> StorageStatusResponse {
    let StorageProbe::Postgres(pool) = storage else {
        return StorageStatusResponse {
            status: "ok",
            detail: Some("in-memory store".to_owned()),
        };
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => StorageStatusResponse {
            status: "ok",
            detail: None,
        },
        Err(error) => StorageStatusResponse {
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
