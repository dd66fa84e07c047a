use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::IdentityData;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .identity_service
        .login(&body.username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| ApiSuccess::new(StatusCode::OK, outcome.into()))
}

/// Login handle may be a username or an email address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: IdentityData,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            access_token: outcome.access_token.clone(),
            token_type: "bearer".to_string(),
            expires_in: outcome.expires_in,
            user: (&outcome.identity).into(),
        }
    }
}
