pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::PatientError;
pub use models::Patient;
pub use ports::PatientServicePort;
pub use service::PatientService;
