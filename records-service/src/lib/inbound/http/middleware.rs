use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::access::errors::AccessError;
use crate::domain::access::guard::AccessGuard;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates the bearer token and adds the `Caller` to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let caller = bearer_token(&req)
        .and_then(|token| state.guard.identity_of(token))
        .map_err(|e| {
            tracing::warn!(error = %e, uri = %req.uri(), "Bearer authentication failed");
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<Option<&str>, AccessError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AccessError::InvalidToken("Authorization header is not ASCII".to_string()))?;

    AccessGuard::bearer_token(value).map(Some).ok_or_else(|| {
        AccessError::InvalidToken("Expected Authorization: Bearer <token>".to_string())
    })
}
