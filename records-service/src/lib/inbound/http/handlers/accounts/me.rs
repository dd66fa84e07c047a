use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::IdentityData;
use crate::domain::access::models::Caller;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .identity_service
        .current(&caller)
        .await
        .map_err(|e| match e {
            // Token outlived its identity
            IdentityError::NotFound(_) => {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            other => ApiError::from(other),
        })
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}
