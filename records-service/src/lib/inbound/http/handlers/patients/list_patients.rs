use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::PatientData;
use crate::domain::access::models::Caller;
use crate::domain::patient::models::PageRequest;
use crate::domain::patient::models::STAFF_ROLES;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<ApiSuccess<Vec<PatientData>>, ApiError> {
    state.guard.authorize(caller.role, &STAFF_ROLES)?;

    let page = PageRequest::new(query.skip, query.limit)?;

    state
        .patient_service
        .list(page)
        .await
        .map_err(ApiError::from)
        .map(|patients| {
            let data: Vec<PatientData> = patients.iter().map(|p| p.into()).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPatientsQuery {
    skip: Option<usize>,
    limit: Option<usize>,
}
