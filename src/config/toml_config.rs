use crate::core::ConfigProvider;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_CATEGORIES_FILE: &str = "categories.json";
const DEFAULT_PRODUCTS_FILE: &str = "products.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub output: Option<OutputConfig>,
    /// Set from `--dry-run`; never read from the file.
    #[serde(skip)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub data_dir: Option<String>,
    pub categories_file: Option<String>,
    pub products_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub progress: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_DB}); unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// A dry run writes to memory, so `database.path` becomes optional.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        self.source.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn categories_file(&self) -> &str {
        self.source
            .categories_file
            .as_deref()
            .unwrap_or(DEFAULT_CATEGORIES_FILE)
    }

    fn products_file(&self) -> &str {
        self.source
            .products_file
            .as_deref()
            .unwrap_or(DEFAULT_PRODUCTS_FILE)
    }

    fn database_path(&self) -> &str {
        self.database.path.as_deref().unwrap_or_default()
    }

    fn show_progress(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.progress)
            .unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("source.data_dir", self.data_dir())?;
        validate_file_extension("source.categories_file", self.categories_file(), &["json"])?;
        validate_file_extension("source.products_file", self.products_file(), &["json"])?;
        if self.dry_run {
            return Ok(());
        }
        let database = validate_required_field("database.path", &self.database.path)?;
        validate_path("database.path", database)
    }
}
