//! Named, versioned cache stores
//!
//! A `CacheStorage` holds any number of named stores, each mapping a
//! `CacheKey` to the most recent response written for it. Writes are
//! last-write-wins; entries are idempotent mirrors of network responses.

use async_trait::async_trait;
use hashbrown::HashMap;
use tokio::sync::RwLock;

use super::error::CacheError;
use super::request::{CacheKey, Response};

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the store `name` if it does not exist yet.
    async fn open(&self, name: &str) -> Result<(), CacheError>;

    /// Names of every existing store, sorted.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Remove a whole store. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;

    async fn match_in(&self, name: &str, key: &CacheKey) -> Result<Option<Response>, CacheError>;

    async fn has(&self, name: &str, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.match_in(name, key).await?.is_some())
    }

    /// First hit for `key` across every store, in store-name order.
    async fn match_any(&self, key: &CacheKey) -> Result<Option<Response>, CacheError> {
        for name in self.keys().await? {
            if let Some(response) = self.match_in(&name, key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    /// Write one entry, creating the store if needed.
    async fn put(&self, name: &str, key: CacheKey, response: Response) -> Result<(), CacheError>;

    /// Write every entry or none of them.
    async fn put_all(&self, name: &str, entries: Vec<(CacheKey, Response)>) -> Result<(), CacheError>;

    /// Keys held by a store, sorted. Empty if the store does not exist.
    async fn entries(&self, name: &str) -> Result<Vec<CacheKey>, CacheError>;
}

type Store = HashMap<CacheKey, Response>;

/// In-process cache storage.
#[derive(Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<HashMap<String, Store>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut stores = self.stores.write().await;
        stores.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let stores = self.stores.read().await;
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.stores.write().await.remove(name).is_some())
    }

    async fn match_in(&self, name: &str, key: &CacheKey) -> Result<Option<Response>, CacheError> {
        let stores = self.stores.read().await;
        Ok(stores.get(name).and_then(|store| store.get(key)).cloned())
    }

    async fn put(&self, name: &str, key: CacheKey, response: Response) -> Result<(), CacheError> {
        let mut stores = self.stores.write().await;
        stores.entry(name.to_string()).or_default().insert(key, response);
        Ok(())
    }

    async fn put_all(&self, name: &str, entries: Vec<(CacheKey, Response)>) -> Result<(), CacheError> {
        // One write guard covers the whole batch
        let mut stores = self.stores.write().await;
        stores.entry(name.to_string()).or_default().extend(entries);
        Ok(())
    }

    async fn entries(&self, name: &str) -> Result<Vec<CacheKey>, CacheError> {
        let stores = self.stores.read().await;
        let mut keys: Vec<CacheKey> = stores
            .get(name)
            .map(|store| store.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
