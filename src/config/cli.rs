use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "catalog-import")]
#[command(about = "Import categories and products from JSON into the catalog database")]
pub struct CliConfig {
    /// Directory holding the JSON input files
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = "categories.json")]
    pub categories: String,

    #[arg(long, default_value = "products.json")]
    pub products: String,

    /// SQLite database file, created if missing
    #[arg(long, default_value = "catalog.db")]
    pub database: String,

    /// TOML configuration file; replaces the path flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// Import into an in-memory store and discard the result
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Disable progress bars")]
    pub no_progress: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn categories_file(&self) -> &str {
        &self.categories
    }

    fn products_file(&self) -> &str {
        &self.products
    }

    fn database_path(&self) -> &str {
        &self.database
    }

    fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_file_extension("categories", &self.categories, &["json"])?;
        validate_file_extension("products", &self.products, &["json"])?;
        if !self.dry_run {
            validate_path("database", &self.database)?;
        }
        Ok(())
    }
}
