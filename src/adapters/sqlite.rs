use crate::domain::model::{Category, CategoryId, NewCategory, NewProduct, Product, ProductId};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    eId        INTEGER NULL,
    title      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    eId        INTEGER NULL,
    title      TEXT NOT NULL,
    price      REAL NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS product_categories (
    product_id  INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (product_id, category_id)
);

CREATE INDEX IF NOT EXISTS categories_eid_index ON categories (eId);
"#;

/// Catalog store backed by a single SQLite connection.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ImportError::PersistenceError {
            message: format!("connection lock poisoned: {}", e),
        })
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, eId, title FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: CategoryId(row.get(0)?),
                external_id: row.get(1)?,
                title: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn products(&self) -> Result<Vec<Product>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, eId, title, price FROM products ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Product {
                id: ProductId(row.get(0)?),
                external_id: row.get(1)?,
                title: row.get(2)?,
                price: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn categories_of_product(&self, product_id: ProductId) -> Result<Vec<CategoryId>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT category_id FROM product_categories WHERE product_id = ?1 ORDER BY category_id",
        )?;
        let rows = stmt.query_map([product_id.0], |row| Ok(CategoryId(row.get(0)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn link_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM product_categories", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl CatalogRepository for SqliteRepository {
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryId> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO categories (eId, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![category.external_id, category.title, now],
        )?;
        Ok(CategoryId(conn.last_insert_rowid()))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO products (eId, title, price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![product.external_id, product.title, product.price, now],
        )?;
        Ok(ProductId(conn.last_insert_rowid()))
    }

    async fn find_category_ids_by_external_ids(&self, external_ids: &[i64]) -> Result<Vec<CategoryId>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let placeholders = vec!["?"; external_ids.len()].join(", ");
        let sql = format!(
            "SELECT id FROM categories WHERE eId IN ({}) ORDER BY id",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(external_ids.iter()), |row| {
            Ok(CategoryId(row.get(0)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn set_product_categories(&self, product_id: ProductId, category_ids: &[CategoryId]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM product_categories WHERE product_id = ?1",
            [product_id.0],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO product_categories (product_id, category_id) VALUES (?1, ?2)",
            )?;
            for category_id in category_ids {
                insert.execute([product_id.0, category_id.0])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
