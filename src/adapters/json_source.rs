use crate::core::{RawCategory, RawProduct, RecordSource, Storage};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Reads the category and product batches from two JSON files, each holding a
/// top-level array.
pub struct JsonRecordSource<S: Storage> {
    storage: S,
    categories_file: String,
    products_file: String,
}

impl<S: Storage> JsonRecordSource<S> {
    pub fn new(storage: S, categories_file: impl Into<String>, products_file: impl Into<String>) -> Self {
        Self {
            storage,
            categories_file: categories_file.into(),
            products_file: products_file.into(),
        }
    }

    async fn read_array(&self, path: &str) -> Result<Vec<Value>> {
        let bytes = self.storage.read_file(path).await?;
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Array(items) => {
                tracing::debug!("Decoded {} records from {}", items.len(), path);
                Ok(items)
            }
            other => Err(ImportError::SourceFormatError {
                path: path.to_string(),
                message: format!("expected a top-level array, found {}", json_type(&other)),
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl<S: Storage> RecordSource for JsonRecordSource<S> {
    async fn categories(&self) -> Result<Vec<RawCategory>> {
        let items = self.read_array(&self.categories_file).await?;
        Ok(items.into_iter().map(RawCategory::from_value).collect())
    }

    async fn products(&self) -> Result<Vec<RawProduct>> {
        let items = self.read_array(&self.products_file).await?;
        Ok(items.into_iter().map(RawProduct::from_value).collect())
    }
}
