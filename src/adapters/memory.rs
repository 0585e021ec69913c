use crate::domain::model::{Category, CategoryId, NewCategory, NewProduct, Product, ProductId};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    links: BTreeMap<ProductId, BTreeSet<CategoryId>>,
}

/// Catalog store kept in process memory. Backs `--dry-run` and the importer
/// tests; ids start at 1 like a fresh SQLite table.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|e| ImportError::PersistenceError {
            message: format!("in-memory store lock poisoned: {}", e),
        })
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.lock()?.categories.clone())
    }

    pub fn products(&self) -> Result<Vec<Product>> {
        Ok(self.lock()?.products.clone())
    }

    pub fn categories_of_product(&self, product_id: ProductId) -> Result<Vec<CategoryId>> {
        let state = self.lock()?;
        Ok(state
            .links
            .get(&product_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    pub fn link_count(&self) -> Result<usize> {
        Ok(self.lock()?.links.values().map(BTreeSet::len).sum())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryId> {
        let mut state = self.lock()?;
        let id = CategoryId(state.categories.len() as i64 + 1);
        state.categories.push(Category {
            id,
            external_id: category.external_id,
            title: category.title.clone(),
        });
        Ok(id)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId> {
        let mut state = self.lock()?;
        let id = ProductId(state.products.len() as i64 + 1);
        state.products.push(Product {
            id,
            external_id: product.external_id,
            title: product.title.clone(),
            price: product.price,
        });
        Ok(id)
    }

    async fn find_category_ids_by_external_ids(&self, external_ids: &[i64]) -> Result<Vec<CategoryId>> {
        let state = self.lock()?;
        Ok(state
            .categories
            .iter()
            .filter(|c| c.external_id.is_some_and(|e| external_ids.contains(&e)))
            .map(|c| c.id)
            .collect())
    }

    async fn set_product_categories(&self, product_id: ProductId, category_ids: &[CategoryId]) -> Result<()> {
        let mut state = self.lock()?;
        if !state.products.iter().any(|p| p.id == product_id) {
            return Err(ImportError::PersistenceError {
                message: format!("product {} does not exist", product_id),
            });
        }
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !state.categories.iter().any(|c| c.id == **id))
        {
            return Err(ImportError::PersistenceError {
                message: format!("category {} does not exist", missing),
            });
        }

        state
            .links
            .insert(product_id, category_ids.iter().copied().collect());
        Ok(())
    }
}
