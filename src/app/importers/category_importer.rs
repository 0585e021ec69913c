use crate::core::report::PhaseReport;
use crate::core::validation::validate_category;
use crate::domain::model::{EntityKind, RawCategory};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::Result;
use crate::utils::progress::PhaseProgress;

pub struct CategoryImporter<'a, R: CatalogRepository> {
    repository: &'a R,
}

impl<'a, R: CatalogRepository> CategoryImporter<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Creates one category per valid record, in input order. Duplicated
    /// external ids each get their own row.
    pub async fn import(&self, records: Vec<RawCategory>, progress: &PhaseProgress) -> Result<PhaseReport> {
        let mut report = PhaseReport::new(EntityKind::Category, records.len());

        for record in records {
            match validate_category(&record) {
                Ok(candidate) => {
                    let id = self.repository.create_category(&candidate).await?;
                    tracing::debug!(id = %id, e_id = ?candidate.external_id, "created category");
                    report.created += 1;
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
}
