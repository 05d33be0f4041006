//! PostgreSQL store: one `products` table, one pooled connection per request.

use super::{ProductStore, StoreSession};
use crate::error::{AppError, ConfigError};
use crate::model::{Product, ProductUpdate};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, Postgres};
use std::str::FromStr;

const COLUMNS: &str = "id, name, description, price, quantity";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create the database if missing, connect, create the table, and seed when asked.
    pub async fn connect(database_url: &str, max_connections: u32, seed: bool) -> Result<Self, AppError> {
        ensure_database_exists(database_url).await?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        ensure_products_table(&pool).await?;
        if seed {
            let inserted = seed_table(&pool).await?;
            tracing::info!(inserted, "seeded products table");
        }
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, AppError> {
        let conn = self.pool.acquire().await?;
        tracing::trace!("session acquired");
        Ok(Box::new(PgSession { conn }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A pooled connection held for the length of one request.
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

impl Drop for PgSession {
    fn drop(&mut self) {
        // The connection itself goes back to the pool when `conn` drops.
        tracing::trace!("session released");
    }
}

#[async_trait]
impl StoreSession for PgSession {
    async fn list(&mut self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {} FROM products ORDER BY id", COLUMNS);
        let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(&mut *self.conn).await?;
        Ok(rows)
    }

    async fn get(&mut self, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    async fn create(&mut self, product: Product) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products ({}) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS, COLUMNS
        );
        tracing::debug!(id = product.id, "insert product");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(AppError::from_db)?;
        Ok(row)
    }

    async fn update(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4, quantity = $5 WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(id, "update product");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(update.price)
            .bind(update.quantity)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    async fn delete(&mut self, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", COLUMNS);
        tracing::debug!(id, "delete product");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }
}

/// Create the `products` table if it does not exist.
pub(crate) async fn ensure_products_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            quantity BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert the starter records, skipping ids that already exist. Safe to run from
/// several processes at once. Returns how many rows were inserted.
pub async fn seed_table(pool: &PgPool) -> Result<u64, AppError> {
    let sql = format!(
        "INSERT INTO products ({}) VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        COLUMNS
    );
    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for p in crate::model::seed_products() {
        let result = sqlx::query(&sql)
            .bind(p.id)
            .bind(&p.name)
            .bind(&p.description)
            .bind(p.price)
            .bind(p.quantity)
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

/// Create the database named in `database_url` if it does not exist. Connects to the
/// `postgres` maintenance database on the same server to do so.
pub(crate) async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_url(database_url, e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| invalid_url(url, "no database path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn invalid_url(url: &str, reason: String) -> AppError {
    AppError::Config(ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value: url.to_string(),
        reason,
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
