use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

const APP_NAME: &str = "MediTrack";

pub async fn root() -> ApiSuccess<RootResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        RootResponseData {
            message: format!("Welcome to {} API", APP_NAME),
            health: "/health".to_string(),
        },
    )
}

/// Reports which backend answers; an emulated store means data is not persisted.
pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthResponseData> {
    let backend = state.store.kind();
    let status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, backend = %backend, "Store liveness probe failed");
            "degraded"
        }
    };

    ApiSuccess::new(
        StatusCode::OK,
        HealthResponseData {
            status: status.to_string(),
            app: APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend: backend.to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootResponseData {
    pub message: String,
    pub health: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: String,
    pub app: String,
    pub version: String,
    pub backend: String,
}
