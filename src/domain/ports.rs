use crate::domain::model::{CategoryId, NewCategory, NewProduct, ProductId, RawCategory, RawProduct};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn categories_file(&self) -> &str;
    fn products_file(&self) -> &str;
    fn database_path(&self) -> &str;
    fn show_progress(&self) -> bool;
}

/// Supplies the two record batches of one import run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn categories(&self) -> Result<Vec<RawCategory>>;
    async fn products(&self) -> Result<Vec<RawProduct>>;
}

/// Persistence primitives the importers need. Implementations own id
/// generation; the importers never see storage details.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryId>;

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId>;

    /// Ids of every category whose external id is in `external_ids`.
    async fn find_category_ids_by_external_ids(&self, external_ids: &[i64]) -> Result<Vec<CategoryId>>;

    /// Replace the product's links with exactly `category_ids`.
    async fn set_product_categories(&self, product_id: ProductId, category_ids: &[CategoryId]) -> Result<()>;
}
