//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::{Mutex, Notify};

use catalog::application::repos::{CreateProductParams, ProductsRepo, RepoError};
use catalog::coordination::{KeyValueStore, StoreError};
use catalog::domain::products::ProductRecord;

/// Pauses `update` between entry and write until released.
#[derive(Clone, Default)]
pub struct UpdateGate {
    pub entered: Arc<Notify>,
    pub proceed: Arc<Notify>,
}

/// Record store kept in memory, counting reads so cache hits are observable.
#[derive(Default)]
pub struct MemoryProductsRepo {
    rows: Mutex<BTreeMap<i64, ProductRecord>>,
    reads: AtomicUsize,
    fail_deletes: AtomicBool,
    gate: StdMutex<Option<UpdateGate>>,
}

impl MemoryProductsRepo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed(&self, id: i64, name: &str, price_cents: i64) -> ProductRecord {
        let now = OffsetDateTime::now_utc();
        let record = ProductRecord {
            id,
            name: name.to_string(),
            price_cents,
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.insert(id, record.clone());
        record
    }

    pub async fn row(&self, id: i64) -> Option<ProductRecord> {
        self.rows.lock().await.get(&id).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn gate_updates(&self) -> UpdateGate {
        let gate = UpdateGate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl ProductsRepo for MemoryProductsRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<ProductRecord>, RepoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ProductRecord>, RepoError> {
        Ok(self.rows.lock().await.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.rows.lock().await.contains_key(&id))
    }

    async fn insert(&self, params: CreateProductParams) -> Result<ProductRecord, RepoError> {
        let mut rows = self.rows.lock().await;
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let now = OffsetDateTime::now_utc();
        let record = ProductRecord {
            id,
            name: params.name,
            price_cents: params.price_cents,
            description: params.description,
            created_at: now,
            updated_at: now,
        };
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, product: &ProductRecord) -> Result<ProductRecord, RepoError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.proceed.notified().await;
        }

        let mut rows = self.rows.lock().await;
        let row = rows.get_mut(&product.id).ok_or(RepoError::NotFound)?;
        row.price_cents = product.price_cents;
        row.description = product.description.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepoError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("delete rejected"));
        }
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// A store that is never reachable.
pub struct UnreachableStore;

fn unreachable<T>() -> Result<T, StoreError> {
    Err(StoreError::unavailable("connection refused"))
}

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn set_if_absent(&self, _: &str, _: &str, _: Duration) -> Result<bool, StoreError> {
        unreachable()
    }

    async fn set(&self, _: &str, _: &str, _: Duration) -> Result<(), StoreError> {
        unreachable()
    }

    async fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
        unreachable()
    }

    async fn delete(&self, _: &str) -> Result<bool, StoreError> {
        unreachable()
    }

    async fn delete_if_equals(&self, _: &str, _: &str) -> Result<bool, StoreError> {
        unreachable()
    }

    async fn increment(&self, _: &str) -> Result<i64, StoreError> {
        unreachable()
    }

    async fn expire(&self, _: &str, _: Duration) -> Result<bool, StoreError> {
        unreachable()
    }

    async fn ttl(&self, _: &str) -> Result<Option<Duration>, StoreError> {
        unreachable()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        unreachable()
    }
}
