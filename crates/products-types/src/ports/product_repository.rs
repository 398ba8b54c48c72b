use async_trait::async_trait;

use crate::domain::product::{NewProduct, Product};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Persists `product`, assigning its id and timestamps.
    async fn create(&self, product: NewProduct) -> Result<Product, RepoError>;

    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, RepoError>;

    async fn close(&self) {}
}
