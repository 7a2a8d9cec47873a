use std::{collections::HashMap, future::Future, hash::Hash, time::Duration};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, trace};

struct Slot<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed cache whose entries expire `ttl` after they were stored.
///
/// The lock is held across the fetch on a miss, so concurrent callers asking
/// for a cold or expired key wait for the one in-flight fetch instead of
/// starting their own. Failed fetches are not stored.
pub struct TtlCache<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live value for `key`, or run `fetch` and store its result.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get(&key) {
            let age = slot.stored_at.elapsed();
            if age < ttl {
                trace!(?key, ?age, "cache hit");
                return Ok(slot.value.clone());
            }
            debug!(?key, ?age, "cache entry expired");
            slots.remove(&key);
        }

        let value = fetch().await?;
        slots.insert(
            key,
            Slot {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}
