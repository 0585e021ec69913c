use crate::core::validation::ValidationFailure;
use crate::domain::model::EntityKind;

/// Outcome of one import phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub kind: EntityKind,
    pub total: usize,
    pub created: usize,
    pub rejected: Vec<ValidationFailure>,
    /// Product-category links written; always zero for categories.
    pub links: usize,
}

impl PhaseReport {
    pub fn new(kind: EntityKind, total: usize) -> Self {
        Self {
            kind,
            total,
            created: 0,
            rejected: Vec::new(),
            links: 0,
        }
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub categories: PhaseReport,
    pub products: PhaseReport,
}

impl ImportSummary {
    pub fn rejected_count(&self) -> usize {
        self.categories.rejected_count() + self.products.rejected_count()
    }
}
