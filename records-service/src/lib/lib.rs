pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::access;
pub use domain::identity;
pub use domain::patient;
pub use domain::store;
