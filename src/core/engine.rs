use crate::app::importers::{CategoryImporter, ProductImporter};
use crate::core::report::ImportSummary;
use crate::core::{CatalogRepository, RecordSource};
use crate::utils::error::Result;
use crate::utils::progress::PhaseProgress;

/// Runs the two import phases in order: every category first, then every
/// product, so product links can resolve against the full category set.
pub struct ImportEngine<S: RecordSource, R: CatalogRepository> {
    source: S,
    repository: R,
    show_progress: bool,
}

impl<S: RecordSource, R: CatalogRepository> ImportEngine<S, R> {
    pub fn new(source: S, repository: R) -> Self {
        Self::new_with_progress(source, repository, false)
    }

    pub fn new_with_progress(source: S, repository: R, show_progress: bool) -> Self {
        Self {
            source,
            repository,
            show_progress,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn run(&self) -> Result<ImportSummary> {
        tracing::info!("Started importing categories");
        let records = self.source.categories().await?;
        let progress = PhaseProgress::new("Categories", records.len(), self.show_progress);
        let categories = CategoryImporter::new(&self.repository)
            .import(records, &progress)
            .await?;
        progress.finish();
        tracing::info!(
            created = categories.created,
            rejected = categories.rejected_count(),
            "Categories imported"
        );

        tracing::info!("Started importing products");
        let records = self.source.products().await?;
        let progress = PhaseProgress::new("Products", records.len(), self.show_progress);
        let products = ProductImporter::new(&self.repository)
            .import(records, &progress)
            .await?;
        progress.finish();
        tracing::info!(
            created = products.created,
            rejected = products.rejected_count(),
            links = products.links,
            "Products imported"
        );

        Ok(ImportSummary {
            categories,
            products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;
    use crate::domain::model::{RawCategory, RawProduct};
    use crate::utils::error::ImportError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct StaticSource {
        categories: serde_json::Value,
        products: serde_json::Value,
        calls: Mutex<Vec<&'static str>>,
    }

    impl StaticSource {
        fn new(categories: serde_json::Value, products: serde_json::Value) -> Self {
            Self {
                categories,
                products,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn items(value: &serde_json::Value) -> Vec<serde_json::Value> {
            value.as_array().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn categories(&self) -> Result<Vec<RawCategory>> {
            self.calls.lock().unwrap().push("categories");
            Ok(Self::items(&self.categories).into_iter().map(RawCategory::from_value).collect())
        }

        async fn products(&self) -> Result<Vec<RawProduct>> {
            self.calls.lock().unwrap().push("products");
            if !self.products.is_array() {
                return Err(ImportError::SourceFormatError {
                    path: "products.json".to_string(),
                    message: "expected a top-level array".to_string(),
                });
            }
            Ok(Self::items(&self.products).into_iter().map(RawProduct::from_value).collect())
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let source = StaticSource::new(
            json!([{"eId": 1, "title": "Fruit"}]),
            json!([{"eId": 10, "title": "Apple", "price": 1.5, "categoryEId": [1]}]),
        );
        let engine = ImportEngine::new(source, InMemoryRepository::new());

        let summary = engine.run().await.unwrap();

        let repo = engine.repository();
        assert_eq!(summary.categories.created, 1);
        assert_eq!(summary.products.created, 1);
        assert_eq!(summary.products.links, 1);
        assert_eq!(repo.categories().unwrap()[0].title, "Fruit");
        assert_eq!(repo.products().unwrap()[0].title, "Apple");
        assert_eq!(repo.products().unwrap()[0].price, 1.5);
        assert_eq!(
            repo.categories_of_product(repo.products().unwrap()[0].id).unwrap(),
            vec![repo.categories().unwrap()[0].id]
        );
    }

    #[tokio::test]
    async fn test_categories_are_read_before_products() {
        let source = StaticSource::new(json!([]), json!([]));
        let engine = ImportEngine::new(source, InMemoryRepository::new());

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.rejected_count(), 0);
        assert_eq!(*engine.source.calls.lock().unwrap(), vec!["categories", "products"]);
    }

    #[tokio::test]
    async fn test_source_failure_aborts_after_categories() {
        let source = StaticSource::new(json!([{"eId": 1, "title": "Fruit"}]), json!({"not": "an array"}));
        let engine = ImportEngine::new(source, InMemoryRepository::new());

        let result = engine.run().await;

        assert!(matches!(result, Err(ImportError::SourceFormatError { .. })));
        // no rollback: the categories phase stays committed
        assert_eq!(engine.repository().categories().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejections_do_not_stop_either_phase() {
        let source = StaticSource::new(
            json!([{"eId": 1, "title": "Fr"}, {"eId": 2, "title": "Vegetables"}]),
            json!([
                {"eId": 10, "title": "Apple", "price": -1, "categoryEId": [2]},
                {"eId": 11, "title": "Carrot", "price": 0.5, "categoryEId": [1, 2]}
            ]),
        );
        let engine = ImportEngine::new(source, InMemoryRepository::new());

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.rejected_count(), 2);
        assert_eq!(summary.products.created, 1);
        assert_eq!(summary.products.links, 1);
    }
}
