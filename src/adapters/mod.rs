// Adapters layer: concrete implementations for files and catalog stores.

pub mod json_source;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use json_source::JsonRecordSource;
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
pub use storage::LocalStorage;
