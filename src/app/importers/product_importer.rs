use crate::core::report::PhaseReport;
use crate::core::validation::validate_product;
use crate::domain::model::{EntityKind, ProductId, RawProduct};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::Result;
use crate::utils::progress::PhaseProgress;

pub struct ProductImporter<'a, R: CatalogRepository> {
    repository: &'a R,
}

impl<'a, R: CatalogRepository> ProductImporter<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Creates one product per valid record and links it to the categories
    /// its external ids resolve to. Categories must already be imported.
    pub async fn import(&self, records: Vec<RawProduct>, progress: &PhaseProgress) -> Result<PhaseReport> {
        let mut report = PhaseReport::new(EntityKind::Product, records.len());

        for record in records {
            match validate_product(&record) {
                Ok(candidate) => {
                    let id = self.repository.create_product(&candidate).await?;
                    report.created += 1;
                    report.links += self.link_categories(id, &record).await?;
                    tracing::debug!(id = %id, e_id = ?candidate.external_id, "created product");
                }
                Err(failure) => {
                    progress.report(&failure.operator_line());
                    tracing::debug!(e_id = %failure.external_id_label(), "{}", failure);
                    report.rejected.push(failure);
                }
            }
            progress.advance();
        }

        Ok(report)
    }

    /// Syncs the product's links to the resolved category ids. External ids
    /// with no matching category are dropped without error.
    async fn link_categories(&self, product_id: ProductId, record: &RawProduct) -> Result<usize> {
        let external_ids = record.category_refs();
        let mut category_ids = self
            .repository
            .find_category_ids_by_external_ids(&external_ids)
            .await?;
        category_ids.sort_unstable();
        category_ids.dedup();

        self.repository
            .set_product_categories(product_id, &category_ids)
            .await?;

        tracing::debug!(
            product = %product_id,
            requested = external_ids.len(),
            linked = category_ids.len(),
            "synced product categories"
        );
        Ok(category_ids.len())
    }
}
