#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use products_types::domain::product::{NewProduct, Product};
use products_types::ports::product_repository::{ProductRepository, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Database URLs with this prefix select the in-memory store.
pub const MEMORY_URL_PREFIX: &str = "memory:";

pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    Repo::build_repo(database_url).await
}

impl Repo {
    pub async fn build_repo(database_url: &str) -> anyhow::Result<Self> {
        if database_url.starts_with(MEMORY_URL_PREFIX) {
            return Self::memory();
        }
        Self::persistent(database_url).await
    }

    #[cfg(feature = "memory")]
    fn memory() -> anyhow::Result<Self> {
        tracing::info!("using in-memory product store");
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(not(feature = "memory"))]
    fn memory() -> anyhow::Result<Self> {
        anyhow::bail!("in-memory store requested but the `memory` feature is disabled")
    }

    #[cfg(feature = "sqlite")]
    async fn persistent(database_url: &str) -> anyhow::Result<Self> {
        Ok(Self::Sqlite(sqlite::SqliteRepo::new(database_url).await?))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn persistent(database_url: &str) -> anyhow::Result<Self> {
        anyhow::bail!(
            "unsupported database url {database_url}: only `{MEMORY_URL_PREFIX}` is available without the `sqlite` feature"
        )
    }
}

#[async_trait::async_trait]
impl ProductRepository for Repo {
    async fn create(&self, product: NewProduct) -> Result<Product, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.create(product).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.create(product).await,
        }
    }

    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.list().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.list().await,
        }
    }

    async fn close(&self) {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.close().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.close().await,
        }
    }
}
