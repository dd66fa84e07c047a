pub mod errors;
pub mod handle;
pub mod models;
pub mod ports;

pub use errors::StoreError;
pub use handle::Collection;
pub use handle::Cursor;
pub use handle::StoreHandle;
pub use models::BackendKind;
pub use models::Changes;
pub use models::Document;
pub use models::Filter;
pub use ports::DocumentStore;
