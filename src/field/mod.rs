pub mod file_store;
pub mod store;

pub use file_store::FileFieldStore;
pub use store::{FieldStore, MemoryFieldStore};
