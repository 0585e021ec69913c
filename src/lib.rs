pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{InMemoryRepository, JsonRecordSource, LocalStorage, SqliteRepository};
pub use crate::core::{engine::ImportEngine, report::ImportSummary};
pub use utils::error::{ImportError, Result};
