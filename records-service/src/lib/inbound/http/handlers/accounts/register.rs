use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::IdentityData;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::store::models::Document;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .identity_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    email: String,
    password: String,
    role: String,
    #[serde(default)]
    profile: Option<Document>,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, IdentityError> {
        Ok(RegisterCommand {
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password: Password::new(self.password)?,
            role: self.role.parse::<Role>()?,
            profile: self.profile,
        })
    }
}
