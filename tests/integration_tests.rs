use anyhow::Result;
use catalog_import::core::ConfigProvider;
use catalog_import::utils::validation::Validate;
use catalog_import::{
    ImportEngine, ImportError, InMemoryRepository, JsonRecordSource, LocalStorage, SqliteRepository,
    TomlConfig,
};
use serde_json::json;
use tempfile::TempDir;

fn write_inputs(dir: &TempDir, categories: serde_json::Value, products: serde_json::Value) -> Result<()> {
    std::fs::write(dir.path().join("categories.json"), serde_json::to_vec(&categories)?)?;
    std::fs::write(dir.path().join("products.json"), serde_json::to_vec(&products)?)?;
    Ok(())
}

fn source(dir: &TempDir) -> JsonRecordSource<LocalStorage> {
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    JsonRecordSource::new(storage, "categories.json", "products.json")
}

#[tokio::test]
async fn test_end_to_end_import_into_sqlite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(
        &temp_dir,
        json!([{"eId": 1, "title": "Fruit"}]),
        json!([{"eId": 10, "title": "Apple", "price": 1.5, "categoryEId": [1]}]),
    )?;
    let db_path = temp_dir.path().join("catalog.db");

    let engine = ImportEngine::new(source(&temp_dir), SqliteRepository::open(&db_path)?);
    let summary = engine.run().await?;

    assert_eq!(summary.categories.created, 1);
    assert_eq!(summary.products.created, 1);
    assert_eq!(summary.products.links, 1);

    // reopen the file to check what was actually committed
    let repo = SqliteRepository::open(&db_path)?;
    let categories = repo.categories()?;
    let products = repo.products()?;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "Fruit");
    assert_eq!(categories[0].external_id, Some(1));
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Apple");
    assert_eq!(products[0].price, 1.5);
    assert_eq!(repo.categories_of_product(products[0].id)?, vec![categories[0].id]);
    assert_eq!(repo.link_count()?, 1);
    Ok(())
}

#[tokio::test]
async fn test_category_resolution_drops_unknown_ids() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(
        &temp_dir,
        json!([{"eId": 1, "title": "Abc"}, {"eId": 2, "title": "Def"}]),
        json!([{"eId": 10, "title": "Apple", "price": 3, "categoriesEId": [1, 2, 99]}]),
    )?;

    let engine = ImportEngine::new(source(&temp_dir), SqliteRepository::open_in_memory()?);
    engine.run().await?;

    let repo = engine.repository();
    let product = &repo.products()?[0];
    let linked: Vec<Option<i64>> = repo
        .categories_of_product(product.id)?
        .into_iter()
        .filter_map(|id| repo.categories().ok()?.into_iter().find(|c| c.id == id))
        .map(|c| c.external_id)
        .collect();
    assert_eq!(linked, vec![Some(1), Some(2)]);
    Ok(())
}

#[tokio::test]
async fn test_rerun_duplicates_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(
        &temp_dir,
        json!([{"eId": 1, "title": "Fruit"}, {"eId": 2, "title": "Vegetables"}]),
        json!([{"eId": 10, "title": "Apple", "price": 1.5, "categoryEId": [1]}]),
    )?;
    let db_path = temp_dir.path().join("catalog.db");

    for _ in 0..2 {
        let engine = ImportEngine::new(source(&temp_dir), SqliteRepository::open(&db_path)?);
        engine.run().await?;
    }

    let repo = SqliteRepository::open(&db_path)?;
    assert_eq!(repo.categories()?.len(), 4);
    assert_eq!(repo.products()?.len(), 2);
    // the second product resolves eId 1 to both "Fruit" rows
    let second = &repo.products()?[1];
    assert_eq!(repo.categories_of_product(second.id)?.len(), 2);
    assert_eq!(repo.link_count()?, 3);
    Ok(())
}

#[tokio::test]
async fn test_invalid_records_are_skipped() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(
        &temp_dir,
        json!([
            {"eId": 1, "title": "Ab"},
            {"eId": 2, "title": "Abc"},
            {"eId": 3, "title": "Abcdefghijkl"},
            {"eId": 4, "title": "Abcdefghijklm"},
            "not an object"
        ]),
        json!([
            {"eId": 10, "title": "Free", "price": 0, "categoryEId": [2]},
            {"eId": 11, "title": "Top", "price": 200, "categoriesEId": [3]},
            {"eId": 12, "title": "Cheap", "price": -0.01, "categoryEId": [2]},
            {"eId": 13, "title": "Dear", "price": 200.01, "categoryEId": [2]},
            {"eId": 14, "title": "Orphan", "price": 5}
        ]),
    )?;

    let engine = ImportEngine::new(source(&temp_dir), SqliteRepository::open_in_memory()?);
    let summary = engine.run().await?;

    assert_eq!(summary.categories.total, 5);
    assert_eq!(summary.categories.created, 2);
    assert_eq!(summary.products.created, 3);
    let rejected: Vec<String> = summary
        .products
        .rejected
        .iter()
        .map(|f| f.operator_line())
        .collect();
    assert_eq!(
        rejected,
        vec!["12 Product did not pass validation", "13 Product did not pass validation"]
    );

    let repo = engine.repository();
    let titles: Vec<String> = repo.products()?.into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Free", "Top", "Orphan"]);
    assert_eq!(repo.link_count()?, 2);
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_number_skips_only_its_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("categories.json"), r#"[{"eId": 1, "title": "Fruit"}]"#)?;
    std::fs::write(
        temp_dir.path().join("products.json"),
        r#"[{"eId": 10, "title": "Apple", "price": 1.5, "categoryEId": [1]},
            {"eId": 11, "title": "Pear", "price": 1e400, "categoryEId": [1]},
            {"eId": 9223372036854775808, "title": "Plum", "price": 3, "categoryEId": [1]}]"#,
    )?;

    let engine = ImportEngine::new(source(&temp_dir), SqliteRepository::open_in_memory()?);
    let summary = engine.run().await?;

    assert_eq!(summary.products.created, 1);
    assert_eq!(summary.products.rejected_count(), 2);
    assert!(summary.products.rejected[0].has_violation("price"));
    assert!(summary.products.rejected[1].has_violation("eId"));
    let products = engine.repository().products()?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Apple");
    assert_eq!(engine.repository().link_count()?, 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_products_file_aborts_after_categories() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("categories.json"), r#"[{"eId": 1, "title": "Fruit"}]"#)?;

    let engine = ImportEngine::new(source(&temp_dir), InMemoryRepository::new());
    let result = engine.run().await;

    assert!(matches!(result, Err(ImportError::IoError(_))));
    assert_eq!(engine.repository().categories()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_import() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("storage");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::write(data_dir.join("cats.json"), r#"[{"eId": 5, "title": "Bakery"}]"#)?;
    std::fs::write(
        data_dir.join("items.json"),
        r#"[{"eId": 50, "title": "Bread", "price": "2.40", "categoryEId": ["5"]}]"#,
    )?;

    let normalized = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[source]
data_dir = "{0}/storage"
categories_file = "cats.json"
products_file = "items.json"

[database]
path = "{0}/catalog.db"
"#,
        normalized
    ))?;
    config.validate()?;

    let storage = LocalStorage::new(config.data_dir().to_string());
    let source = JsonRecordSource::new(storage, config.categories_file(), config.products_file());
    let engine = ImportEngine::new(source, SqliteRepository::open(config.database_path())?);
    let summary = engine.run().await?;

    assert_eq!(summary.products.links, 1);
    let repo = SqliteRepository::open(config.database_path())?;
    assert_eq!(repo.products()?[0].price, 2.4);
    Ok(())
}
