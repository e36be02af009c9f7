//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::config::StorageKind;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    storage: &'static str,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = match state.service.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };
    let storage = match state.storage {
        StorageKind::Postgres => "postgres",
        StorageKind::Memory => "memory",
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            service: "booking-server",
            version: env!("CARGO_PKG_VERSION"),
            storage,
        }),
    )
}
