use crate::fetch::error::FetchError;
use crate::fetch::payload::RawPayload;
use crate::fetch::request::CacheKey;
use log::{debug, info};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type Slot = Arc<OnceCell<Arc<RawPayload>>>;

/// In-memory store of fetched payloads keyed by request identity.
///
/// Concurrent callers asking for the same key share one fetch. A failed fetch is not
/// stored, so the next caller tries again.
#[derive(Debug, Default)]
pub struct ResponseCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached payload for `key`, running `fetch` only if none is stored yet.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Arc<RawPayload>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawPayload, FetchError>>,
    {
        // Only hold the map lock long enough to find or create the slot.
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key.clone()).or_default().clone()
        };
        if let Some(payload) = slot.get() {
            debug!("Response cache hit");
            return Ok(payload.clone());
        }
        let fetched = slot
            .get_or_try_init(move || async move {
                info!("Response cache miss, fetching");
                fetch().await.map(Arc::new)
            })
            .await;
        match fetched {
            Ok(payload) => Ok(payload.clone()),
            Err(e) => {
                self.forget_empty(&key, &slot).await;
                Err(e)
            }
        }
    }

    /// Drops the slot for `key` if it is still `slot` and still empty.
    async fn forget_empty(&self, key: &CacheKey, slot: &Slot) {
        let mut slots = self.slots.lock().await;
        if slots
            .get(key)
            .is_some_and(|stored| Arc::ptr_eq(stored, slot) && !stored.initialized())
        {
            slots.remove(key);
        }
    }

    /// Number of stored payloads.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}
