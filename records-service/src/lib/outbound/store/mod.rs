pub mod emulated;
pub mod postgres;
pub mod selector;

pub use emulated::EmulatedDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use selector::StoreSelector;
