use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Explicit `(value, expires_at)` cache refreshed by the caller on access.
///
/// When a refresh fails and an expired value is still held, the stale value is
/// served instead of the error.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &K) -> (Option<V>, bool) {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) => (Some(entry.value.clone()), entry.expires_at > Instant::now()),
            None => (None, false),
        }
    }

    pub async fn get_or_refresh<F, Fut, E>(&self, key: &K, load: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
        E: std::fmt::Display,
    {
        let (cached, fresh) = self.lookup(key);
        if fresh {
            return Ok(cached);
        }

        match load().await {
            Ok(Some(value)) => {
                let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
                entries.insert(
                    key.clone(),
                    Entry {
                        value: value.clone(),
                        expires_at: Instant::now() + self.ttl,
                    },
                );
                Ok(Some(value))
            }
            Ok(None) => {
                let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
                entries.remove(key);
                Ok(None)
            }
            Err(e) => match cached {
                Some(stale) => {
                    tracing::warn!(error = %e, "Cache refresh failed, serving stale entry");
                    Ok(Some(stale))
                }
                None => Err(e),
            },
        }
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}
