use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::access::errors::AccessError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::patient::errors::PatientError;

pub mod accounts;
pub mod health;
pub mod patients;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(cause) => {
                tracing::error!(error = %cause, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Unauthorized(msg) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ApiResponseBody::new_error(StatusCode::UNAUTHORIZED, msg)),
                )
                    .into_response();
            }
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Forbidden { .. } => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            AccessError::MissingToken
            | AccessError::InvalidToken(_)
            | AccessError::ExpiredToken => {
                tracing::debug!(reason = %err, "Request unauthenticated");
                ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials | IdentityError::InactiveAccount => {
                ApiError::Unauthorized(err.to_string())
            }
            IdentityError::DuplicateIdentity => ApiError::Conflict(err.to_string()),
            IdentityError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IdentityError::InvalidUsername(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::InvalidPassword(_)
            | IdentityError::InvalidRole(_) => ApiError::UnprocessableEntity(err.to_string()),
            IdentityError::Store(_) | IdentityError::Internal(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PatientError::InvalidData(_) | PatientError::InvalidPage(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            PatientError::IdExhausted(_) | PatientError::Store(_) | PatientError::Internal(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
