use axum::http::StatusCode;
use serde::Serialize;

use crate::inbound::http::handlers::ApiSuccess;

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> ApiSuccess<LogoutResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Successfully logged out".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
