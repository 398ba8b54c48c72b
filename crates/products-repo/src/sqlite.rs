use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use products_types::domain::product::{NewProduct, Product};
use products_types::ports::product_repository::{ProductRepository, RepoError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbProduct {
    id: String,
    name: String,
    price: f64,
    created_at: String,
    updated_at: String,
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_ts(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| RepoError::DbError(e.to_string()))?
        .with_timezone(&Utc))
}

impl DbProduct {
    fn into_product(self) -> Result<Product, RepoError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(Product {
            id,
            name: self.name,
            price: self.price,
            created_at: decode_ts(&self.created_at)?,
            updated_at: decode_ts(&self.updated_at)?,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_products.sql");
        sqlx::query(ddl).execute(&pool).await?;

        tracing::info!(url = %database_url, "sqlite product store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ProductRepository for SqliteRepo {
    async fn create(&self, product: NewProduct) -> Result<Product, RepoError> {
        let product = product.into_product(Uuid::new_v4(), Utc::now());
        sqlx::query(
            "INSERT INTO products (id, name, price, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.price)
        .bind(encode_ts(product.created_at))
        .bind(encode_ts(product.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        let rows: Vec<DbProduct> = sqlx::query_as(
            "SELECT id, name, price, created_at, updated_at FROM products
             ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;

        rows.into_iter()
            .map(|r| r.into_product())
            .collect::<Result<Vec<_>, _>>()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
