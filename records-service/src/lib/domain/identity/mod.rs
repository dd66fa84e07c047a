pub mod errors;
pub mod models;
pub mod ports;
pub mod seed;
pub mod service;

pub use errors::IdentityError;
pub use models::Identity;
pub use models::Role;
pub use ports::IdentityServicePort;
pub use service::IdentityService;
