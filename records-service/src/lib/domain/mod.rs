pub mod access;
pub mod identity;
pub mod patient;
pub mod store;
