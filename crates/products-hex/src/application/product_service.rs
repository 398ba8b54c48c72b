use crate::errors::AppError;
use products_types::domain::product::{NewProduct, Product};
use products_types::ports::product_repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates before touching the store; invalid input never reaches `repo`.
    pub async fn create_product(&self, name: &str, price: f64) -> Result<Product, AppError> {
        let product = NewProduct::new(name, price)?;
        let saved = self
            .repo
            .create(product)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        tracing::info!(id = %saved.id, name = %saved.name, price = saved.price, "product saved");
        Ok(saved)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn close(&self) {
        self.repo.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use products_types::domain::product::ValidationError;

    #[tokio::test]
    async fn create_and_list_in_memory() {
        let repo = products_repo::memory::InMemoryRepo::new();
        let svc = ProductService::new(repo.clone());
        let res = svc.create_product(" Widget ", 9.99).await;
        assert!(res.is_ok());
        let product = res.unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);

        let list = svc.list_products().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, product.id);
    }

    #[tokio::test]
    async fn validation_errors_propagate_without_persisting() {
        let repo = products_repo::memory::InMemoryRepo::new();
        let svc = ProductService::new(repo.clone());

        let res = svc.create_product("   ", 1.0).await;
        assert!(matches!(
            res,
            Err(AppError::Validation(ValidationError::InvalidName))
        ));

        let res = svc.create_product("Gadget", -1.0).await;
        assert!(matches!(
            res,
            Err(AppError::Validation(ValidationError::InvalidPrice))
        ));

        let res = svc.create_product("Gadget", f64::NAN).await;
        assert!(matches!(
            res,
            Err(AppError::Validation(ValidationError::InvalidPrice))
        ));

        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = products_repo::memory::InMemoryRepo::new();
        let svc = ProductService::new(repo);
        let a = svc.create_product("A", 1.0).await.unwrap();
        let b = svc.create_product("B", 2.0).await.unwrap();
        let c = svc.create_product("C", 3.0).await.unwrap();

        let ids: Vec<_> = svc
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }
}
