use async_trait::async_trait;

use crate::domain::access::models::Caller;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::PageRequest;
use crate::domain::patient::models::Patient;

/// Port for patient record operations.
///
/// Role checks happen at the boundary; these operations assume an
/// authorized staff caller.
#[async_trait]
pub trait PatientServicePort: Send + Sync + 'static {
    /// List active patients in store order.
    ///
    /// # Errors
    /// * `Store` - Store operation failed
    async fn list(&self, page: PageRequest) -> Result<Vec<Patient>, PatientError>;

    /// Register a patient with a freshly allocated `patientId`.
    ///
    /// # Arguments
    /// * `command` - Validated patient data
    /// * `caller` - Staff member creating the record
    ///
    /// # Errors
    /// * `IdExhausted` - No free `patientId` found
    /// * `Store` - Store operation failed
    async fn create(
        &self,
        command: CreatePatientCommand,
        caller: &Caller,
    ) -> Result<Patient, PatientError>;

    /// Retrieve a patient by store identifier.
    ///
    /// # Errors
    /// * `NotFound` - No patient with this id
    /// * `Store` - Store operation failed
    async fn get(&self, id: &str) -> Result<Patient, PatientError>;
}
