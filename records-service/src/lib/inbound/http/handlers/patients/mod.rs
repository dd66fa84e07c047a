use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::patient::models::Patient;
use crate::domain::store::models::Document;

pub mod create_patient;
pub mod get_patient;
pub mod list_patients;

pub use create_patient::create_patient;
pub use get_patient::get_patient;
pub use list_patients::list_patients;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub id: String,
    pub patient_id: String,
    pub personal_info: Document,
    pub medical_info: Document,
    pub assigned_doctor: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_visit: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Patient> for PatientData {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            patient_id: patient.patient_id.clone(),
            personal_info: patient.personal_info.clone(),
            medical_info: patient.medical_info.clone(),
            assigned_doctor: patient.assigned_doctor.clone(),
            registration_date: patient.registration_date,
            last_visit: patient.last_visit,
            is_active: patient.is_active,
            created_at: patient.created_at,
        }
    }
}
