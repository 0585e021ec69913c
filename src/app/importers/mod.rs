pub mod category_importer;
pub mod product_importer;

pub use category_importer::CategoryImporter;
pub use product_importer::ProductImporter;
