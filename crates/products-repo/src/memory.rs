use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use products_types::domain::product::{NewProduct, Product};
use products_types::ports::product_repository::{ProductRepository, RepoError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

struct Stored {
    // insertion order, breaks ties between equal `created_at` values
    seq: u64,
    product: Product,
}

#[derive(Clone)]
pub struct InMemoryRepo {
    map: Arc<DashMap<Uuid, Stored>>,
    next_seq: Arc<AtomicU64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepo {
    async fn create(&self, product: NewProduct) -> Result<Product, RepoError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let product = product.into_product(Uuid::new_v4(), Utc::now());
        self.map.insert(
            product.id,
            Stored {
                seq,
                product: product.clone(),
            },
        );
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        let mut rows: Vec<(u64, Product)> = self
            .map
            .iter()
            .map(|kv| (kv.value().seq, kv.value().product.clone()))
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });
        Ok(rows.into_iter().map(|(_, p)| p).collect())
    }
}
