//! Cache-aside protocol of the manual strategy against the in-process store.

mod support;

use std::sync::Arc;
use std::time::Duration;

use catalog::application::products::{ProductError, ProductService, ProductServices};
use catalog::cache::product_key;
use catalog::coordination::{KeyValueStore, LockManager, StoreError};
use catalog::domain::products::{CacheMode, CreateProductCommand, ProductPatch};
use catalog::infra::kv::InMemoryStore;

use support::{MemoryProductsRepo, UnreachableStore};

const TTL: Duration = Duration::from_secs(60);

fn manual(
    repo: &Arc<MemoryProductsRepo>,
    store: Arc<dyn KeyValueStore>,
) -> Arc<dyn ProductService> {
    ProductServices::new(repo.clone(), store, TTL).resolve(CacheMode::Manual)
}

fn lamp() -> CreateProductCommand {
    CreateProductCommand {
        name: "lamp".to_string(),
        price_cents: 1_000,
        description: Some("desk lamp".to_string()),
    }
}

#[tokio::test]
async fn create_does_not_populate_and_second_read_is_a_hit() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    let created = service.create(lamp()).await.unwrap();
    let key = product_key(created.id);
    assert!(store.get(&key).await.unwrap().is_none());

    let first = service.get(created.id).await.unwrap();
    assert_eq!(first, created);
    assert_eq!(repo.reads(), 1);
    assert!(store.get(&key).await.unwrap().is_some());

    let second = service.get(created.id).await.unwrap();
    assert_eq!(second, created);
    assert_eq!(repo.reads(), 1, "second read must be served from the cache");
}

#[tokio::test]
async fn update_then_read_reflects_the_new_price() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    let created = service.create(lamp()).await.unwrap();
    service.get(created.id).await.unwrap();

    let updated = service
        .update(
            created.id,
            ProductPatch {
                price_cents: Some(2_500),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price_cents, 2_500);
    assert_eq!(updated.description.as_deref(), Some("desk lamp"));
    assert!(
        store.get(&product_key(created.id)).await.unwrap().is_none(),
        "update must not repopulate"
    );

    assert_eq!(service.get(created.id).await.unwrap().price_cents, 2_500);
}

#[tokio::test(start_paused = true)]
async fn entries_expire_after_the_ttl() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store);

    let created = service.create(lamp()).await.unwrap();
    service.get(created.id).await.unwrap();
    service.get(created.id).await.unwrap();
    assert_eq!(repo.reads(), 1);

    tokio::time::advance(TTL).await;
    service.get(created.id).await.unwrap();
    assert_eq!(repo.reads(), 2);
}

#[tokio::test]
async fn delete_of_missing_id_touches_nothing() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    store
        .set(&product_key(7), "\"sentinel\"", TTL)
        .await
        .unwrap();

    let err = service.delete(7).await.unwrap_err();
    assert!(matches!(err, ProductError::NotFound { id: 7 }));
    assert_eq!(
        store.get(&product_key(7)).await.unwrap().as_deref(),
        Some("\"sentinel\"")
    );
}

#[tokio::test]
async fn delete_evicts_before_the_store_write() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    let created = service.create(lamp()).await.unwrap();
    service.get(created.id).await.unwrap();

    repo.fail_deletes();
    let err = service.delete(created.id).await.unwrap_err();
    assert!(matches!(err, ProductError::Repo(_)));

    assert!(
        store.get(&product_key(created.id)).await.unwrap().is_none(),
        "entry is evicted even though the store delete failed"
    );
    assert!(repo.row(created.id).await.is_some());
}

#[tokio::test]
async fn delete_removes_row_and_entry() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    let created = service.create(lamp()).await.unwrap();
    service.get(created.id).await.unwrap();
    service.delete(created.id).await.unwrap();

    assert!(repo.row(created.id).await.is_none());
    assert!(store.get(&product_key(created.id)).await.unwrap().is_none());
    assert!(matches!(
        service.get(created.id).await,
        Err(ProductError::NotFound { .. })
    ));
}

#[tokio::test]
async fn concurrent_reader_can_repopulate_a_stale_value() {
    let repo = MemoryProductsRepo::new();
    let store = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());

    let created = service.create(lamp()).await.unwrap();
    service.get(created.id).await.unwrap();

    let gate = repo.gate_updates();
    let writer = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .update(
                    created.id,
                    ProductPatch {
                        price_cents: Some(9_900),
                        description: None,
                    },
                )
                .await
        })
    };

    // The writer has evicted and is about to persist.
    gate.entered.notified().await;
    let during = service.get(created.id).await.unwrap();
    assert_eq!(during.price_cents, 1_000);

    gate.proceed.notify_one();
    let written = writer.await.unwrap().unwrap();
    assert_eq!(written.price_cents, 9_900);

    let after = service.get(created.id).await.unwrap();
    assert_eq!(after.price_cents, 1_000, "stale entry survives until its TTL");
    assert_eq!(repo.row(created.id).await.unwrap().price_cents, 9_900);
}

#[tokio::test]
async fn read_during_a_held_lock_leaves_the_token_in_place() {
    let repo = MemoryProductsRepo::new();
    repo.seed(42, "kettle", 3_000).await;
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let service = manual(&repo, store.clone());
    let locks = LockManager::new(store.clone());

    let key = product_key(42);
    let token = locks
        .try_lock(&key, Duration::from_secs(60))
        .await
        .unwrap()
        .expect("lock is free");

    let err = service.get(42).await.unwrap_err();
    assert!(matches!(
        err,
        ProductError::Store(StoreError::Encoding { .. })
    ));
    assert_eq!(repo.reads(), 0);
    assert_eq!(store.get(&key).await.unwrap().as_deref(), Some(token.as_str()));

    assert!(locks.unlock(&key, &token).await.unwrap());
    assert_eq!(service.get(42).await.unwrap().price_cents, 3_000);
}

#[tokio::test]
async fn store_failures_propagate() {
    let repo = MemoryProductsRepo::new();
    let service = manual(&repo, Arc::new(UnreachableStore));

    let created = service.create(lamp()).await.unwrap();
    let err = service.get(created.id).await.unwrap_err();
    assert!(matches!(
        err,
        ProductError::Store(StoreError::Unavailable { .. })
    ));
    assert_eq!(repo.reads(), 0, "an unreachable cache is not a miss");
}
