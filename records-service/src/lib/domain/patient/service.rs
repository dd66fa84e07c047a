use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::models::Caller;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::medical_info_with_defaults;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::PageRequest;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientRecord;
use crate::domain::patient::models::PATIENTS_COLLECTION;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::store::handle::Collection;
use crate::domain::store::handle::StoreHandle;
use crate::domain::store::models::Filter;

const MAX_ID_ATTEMPTS: usize = 100;

/// Domain service for patient records.
pub struct PatientService {
    store: StoreHandle,
}

impl PatientService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    fn patients(&self) -> Collection {
        self.store.collection(PATIENTS_COLLECTION)
    }

    /// First free `P<seconds>` id at or after `start_seconds`.
    async fn next_patient_id(
        &self,
        patients: &Collection,
        start_seconds: i64,
    ) -> Result<String, PatientError> {
        for offset in 0..MAX_ID_ATTEMPTS as i64 {
            let candidate = format!("P{}", start_seconds + offset);
            if patients
                .find_one(Filter::eq("patientId", candidate.as_str()))
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
            tracing::debug!(patient_id = %candidate, "Patient id taken, retrying");
        }

        Err(PatientError::IdExhausted(MAX_ID_ATTEMPTS))
    }
}

#[async_trait]
impl PatientServicePort for PatientService {
    async fn list(&self, page: PageRequest) -> Result<Vec<Patient>, PatientError> {
        let documents = self
            .patients()
            .find(Filter::eq("isActive", true))
            .skip(page.skip())
            .limit(page.limit())
            .collect(Some(page.limit()))
            .await?;

        documents.into_iter().map(Patient::try_from).collect()
    }

    async fn create(
        &self,
        command: CreatePatientCommand,
        caller: &Caller,
    ) -> Result<Patient, PatientError> {
        let patients = self.patients();
        let now = Utc::now();
        let patient_id = self.next_patient_id(&patients, now.timestamp()).await?;

        let document = PatientRecord {
            id: None,
            patient_id,
            personal_info: command.personal_info.into_inner(),
            medical_info: medical_info_with_defaults(command.medical_info),
            assigned_doctor: command.assigned_doctor,
            registration_date: now,
            last_visit: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: Some(caller.identity_id.to_string()),
        }
        .into_document()?;

        let id = patients.insert_one(document).await?;
        let patient = self.get(&id).await?;

        tracing::info!(
            id = %patient.id,
            patient_id = %patient.patient_id,
            created_by = %caller.username,
            "Patient registered"
        );

        Ok(patient)
    }

    async fn get(&self, id: &str) -> Result<Patient, PatientError> {
        self.patients()
            .find_one(Filter::by_id(id))
            .await?
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
            .and_then(Patient::try_from)
    }
}
