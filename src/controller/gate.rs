use crate::cache::{CacheStore, Lookup};
use crate::error::CoreError;
use chrono::Duration;
use futures::FutureExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Single entry point for every cached fetch: cache hit short-circuit,
/// in-flight de-duplication, and population on success.
#[derive(Clone)]
pub struct FetchGate {
    store: Arc<CacheStore>,
}

impl FetchGate {
    #[must_use]
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Returns the cached value for `key`, or runs `producer` to get one.
    ///
    /// At most one producer runs per key at a time; concurrent callers share
    /// its outcome. Failures are handed back but never cached.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the producer fails or its value cannot be encoded
    pub async fn fetch_or_cached<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, CoreError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        if let Some(value) = self.store.get(key) {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    debug!(key, "cache hit");
                    return Ok(hit);
                }
                Err(e) => {
                    // a snapshot written by an older build can hold another shape
                    warn!(key, error = %e, "cached value has unexpected shape; refetching");
                    self.store.remove(key);
                }
            }
        }

        let value = match self.begin(key, ttl, producer) {
            Lookup::Hit(value) => value,
            Lookup::Join(fetch) => {
                debug!(key, "joining in-flight fetch");
                fetch.await?
            }
            Lookup::Lead(fetch) => {
                debug!(key, "cache miss; fetching");
                fetch.await?
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    fn begin<T, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Lookup
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let owned_key = key.to_string();
        // producer() only runs on first poll, after the slot lock is released
        self.store.lookup_or_begin(key, move |id| {
            async move {
                let result = match producer().await {
                    Ok(value) => serde_json::to_value(value).map_err(CoreError::from),
                    Err(e) => Err(e),
                };
                if let Err(e) = &result {
                    debug!(key = %owned_key, error = %e, "fetch failed; not cached");
                }
                store.settle(&owned_key, id, &result, ttl);
                result
            }
            .boxed()
            .shared()
        })
    }
}
