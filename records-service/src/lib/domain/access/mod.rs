pub mod errors;
pub mod guard;
pub mod models;

pub use errors::AccessError;
pub use guard::AccessGuard;
pub use models::Caller;
