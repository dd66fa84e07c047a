use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::PatientData;
use crate::domain::access::models::Caller;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::PersonalInfo;
use crate::domain::patient::models::STAFF_ROLES;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::store::models::Document;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn create_patient(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreatePatientRequestBody>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    state.guard.authorize(caller.role, &STAFF_ROLES)?;

    state
        .patient_service
        .create(body.try_into_command()?, &caller)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::CREATED, patient.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequestBody {
    personal_info: Document,
    #[serde(default)]
    medical_info: Option<Document>,
    #[serde(default)]
    assigned_doctor: Option<String>,
}

impl CreatePatientRequestBody {
    fn try_into_command(self) -> Result<CreatePatientCommand, PatientError> {
        Ok(CreatePatientCommand {
            personal_info: PersonalInfo::new(self.personal_info)?,
            medical_info: self.medical_info,
            assigned_doctor: self.assigned_doctor,
        })
    }
}
