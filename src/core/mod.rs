pub mod engine;
pub mod report;
pub mod validation;

pub use crate::domain::model::{RawCategory, RawProduct};
pub use crate::domain::ports::{CatalogRepository, ConfigProvider, RecordSource, Storage};
pub use crate::utils::error::Result;
