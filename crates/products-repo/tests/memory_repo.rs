#![cfg(feature = "memory")]

use products_repo::memory::InMemoryRepo;
use products_types::domain::product::NewProduct;
use products_types::ports::product_repository::ProductRepository;

#[tokio::test]
async fn memory_repo_create_and_list() {
    let repo = InMemoryRepo::new();
    let created = repo
        .create(NewProduct::new(" Widget ", 9.99).unwrap())
        .await
        .unwrap();
    assert_eq!(created.name, "Widget");
    assert_eq!(created.price, 9.99);
    assert!(!created.id.is_nil());
    assert_eq!(created.created_at, created.updated_at);

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn memory_repo_lists_newest_first() {
    let repo = InMemoryRepo::new();
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let p = repo.create(NewProduct::new(name, 1.0).unwrap()).await.unwrap();
        ids.push(p.id);
    }

    let listed: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn memory_repo_clones_share_state() {
    let repo = InMemoryRepo::new();
    let other = repo.clone();
    assert!(other.is_empty());
    repo.create(NewProduct::new("Shared", 3.0).unwrap())
        .await
        .unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other.list().await.unwrap()[0].name, "Shared");
}

#[tokio::test]
async fn memory_repo_empty_list() {
    let repo = InMemoryRepo::default();
    assert!(repo.list().await.unwrap().is_empty());
}
