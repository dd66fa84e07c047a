use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::PatientData;
use crate::domain::access::models::Caller;
use crate::domain::patient::models::STAFF_ROLES;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_patient(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    state.guard.authorize(caller.role, &STAFF_ROLES)?;

    state
        .patient_service
        .get(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}
