use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::domain::identity::models::Role;
use crate::domain::patient::errors::PatientError;
use crate::domain::store::models::Document;

/// Collection holding patient documents.
pub const PATIENTS_COLLECTION: &str = "patients";

/// Roles allowed to read and create patient records.
pub const STAFF_ROLES: [Role; 3] = [Role::Admin, Role::Doctor, Role::Nurse];

/// Patient record as returned to clinical staff.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub patient_id: String,
    pub personal_info: Document,
    pub medical_info: Document,
    pub assigned_doctor: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_visit: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

/// Demographic block of a patient; first and last name are mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalInfo(Document);

impl PersonalInfo {
    const REQUIRED_FIELDS: [&'static str; 2] = ["firstName", "lastName"];

    /// # Errors
    /// * `InvalidData` - A required name field is missing or blank
    pub fn new(info: Document) -> Result<Self, PatientError> {
        for field in Self::REQUIRED_FIELDS {
            let present = info
                .get(field)
                .and_then(Value::as_str)
                .map_or(false, |value| !value.trim().is_empty());
            if !present {
                return Err(PatientError::InvalidData(format!(
                    "personalInfo.{} is required",
                    field
                )));
            }
        }
        Ok(Self(info))
    }

    pub fn into_inner(self) -> Document {
        self.0
    }
}

/// Medical block with empty lists for the list fields the caller omitted.
pub fn medical_info_with_defaults(info: Option<Document>) -> Document {
    let mut info = info.unwrap_or_default();
    for field in ["allergies", "chronicConditions", "medications"] {
        info.entry(field).or_insert_with(|| json!([]));
    }
    info
}

#[derive(Debug)]
pub struct CreatePatientCommand {
    pub personal_info: PersonalInfo,
    pub medical_info: Option<Document>,
    pub assigned_doctor: Option<String>,
}

/// Offset pagination over active patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: usize,
    limit: usize,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: usize = 10;
    pub const MAX_LIMIT: usize = 100;

    /// # Errors
    /// * `InvalidPage` - Limit outside `1..=100`
    pub fn new(skip: Option<usize>, limit: Option<usize>) -> Result<Self, PatientError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(PatientError::InvalidPage(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }

        Ok(Self {
            skip: skip.unwrap_or(0),
            limit,
        })
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatientRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_id: String,
    pub personal_info: Document,
    #[serde(default)]
    pub medical_info: Document,
    #[serde(default)]
    pub assigned_doctor: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl PatientRecord {
    pub fn into_document(self) -> Result<Document, PatientError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(other) => Err(PatientError::Internal(format!(
                "patient serialized to non-object: {}",
                other
            ))),
            Err(e) => Err(PatientError::Internal(e.to_string())),
        }
    }
}

impl TryFrom<Document> for Patient {
    type Error = PatientError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let record: PatientRecord = serde_json::from_value(Value::Object(document))
            .map_err(|e| PatientError::Internal(format!("malformed patient document: {}", e)))?;

        Ok(Patient {
            id: record
                .id
                .ok_or_else(|| PatientError::Internal("patient document without _id".to_string()))?,
            patient_id: record.patient_id,
            personal_info: record.personal_info,
            medical_info: record.medical_info,
            assigned_doctor: record.assigned_doctor,
            registration_date: record.registration_date,
            last_visit: record.last_visit,
            is_active: record.is_active,
            created_at: record.created_at,
            created_by: record.created_by,
        })
    }
}
