use catalog_import::core::{ConfigProvider, Result};
use catalog_import::utils::{logger, validation::Validate};
use catalog_import::{
    CliConfig, ImportEngine, ImportSummary, InMemoryRepository, JsonRecordSource, LocalStorage,
    SqliteRepository, TomlConfig,
};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting catalog-import");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path).map(|c| c.with_dry_run(cli.dry_run)) {
                Ok(config) => {
                    let show_progress = cli.show_progress() && config.show_progress();
                    execute(&config, cli.dry_run, show_progress).await
                }
                Err(e) => Err(e),
            }
        }
        None => execute(&cli, cli.dry_run, cli.show_progress()).await,
    };

    match outcome {
        Ok(summary) => {
            print_summary(&summary, cli.dry_run);
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn execute<C: ConfigProvider + Validate>(
    config: &C,
    dry_run: bool,
    show_progress: bool,
) -> Result<ImportSummary> {
    // 驗證配置
    config.validate()?;

    let storage = LocalStorage::new(config.data_dir().to_string());
    let source = JsonRecordSource::new(storage, config.categories_file(), config.products_file());

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - records go to an in-memory store");
        let engine = ImportEngine::new_with_progress(source, InMemoryRepository::new(), show_progress);
        engine.run().await
    } else {
        tracing::info!("Writing to database: {}", config.database_path());
        let repository = SqliteRepository::open(config.database_path())?;
        let engine = ImportEngine::new_with_progress(source, repository, show_progress);
        engine.run().await
    }
}

fn print_summary(summary: &ImportSummary, dry_run: bool) {
    let categories = &summary.categories;
    let products = &summary.products;

    println!(
        "✅ Categories: {} created, {} rejected (of {})",
        categories.created,
        categories.rejected_count(),
        categories.total
    );
    println!(
        "✅ Products: {} created, {} rejected (of {}), {} category links",
        products.created,
        products.rejected_count(),
        products.total,
        products.links
    );
    if dry_run {
        println!("🔍 Dry run: nothing was written to the database");
    }
}
