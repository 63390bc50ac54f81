use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Exact (title, normalized year) pair of a catalog search.
    Search {
        title: String,
        year: Option<String>,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { title, year } => {
                write!(f, "search:{}:{}", title, year.as_deref().unwrap_or("-"))
            }
        }
    }
}

struct Entry {
    payload: String,
    expires_at: Instant,
}

/// In-process TTL cache.
///
/// Values are stored as serialized JSON so one cache serves heterogeneous
/// value types. Entries past their TTL are treated as absent; there is no
/// eviction beyond that. Shared read-mostly across sessions, last write for a
/// key wins.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss or when the entry's TTL has elapsed.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let entries = self.entries.read().await;
        match entries.get(&key.to_string()) {
            Some(entry) if entry.expires_at > Instant::now() => {
                let data = serde_json::from_str(&entry.payload).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            _ => Ok(None),
        }
    }

    /// Stores a value in the cache with the given TTL in seconds
    pub async fn set<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let entry = Entry {
            payload: json,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
    }
}

/// A macro to simplify caching logic.
///
/// Checks whether a value is present in the cache. If found, it returns the
/// cached value. If not found, it executes the provided block to compute the
/// value, stores it in the cache, and returns the computed value. Errors from
/// the block propagate uncached, so a failed computation is retried on the
/// next call.
///
/// # Arguments
/// * `$cache`: The cache instance to use for retrieval and storage.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The block of code to execute if the value is not found in cache.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        // Attempt to get the value from cache
        if let Some(cached) = $cache.get(&$key).await? {
            Ok(cached)
        } else {
            // If not in cache, execute the block to compute the value
            let value = $block.await?;
            // Store the computed value in cache
            $cache.set(&$key, &value, $ttl).await;
            Ok(value)
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(title: &str, year: Option<&str>) -> CacheKey {
        CacheKey::Search {
            title: title.to_string(),
            year: year.map(str::to_string),
        }
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(format!("{}", key("Inception", None)), "search:Inception:-");
        assert_eq!(
            format!("{}", key("Casablanca", Some("1942"))),
            "search:Casablanca:1942"
        );
    }

    #[test]
    fn test_cache_key_is_case_sensitive() {
        assert_ne!(
            format!("{}", key("inception", None)),
            format!("{}", key("Inception", None))
        );
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = Cache::new();
        let retrieved: Option<Vec<String>> = cache.get(&key("nothing", None)).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = Cache::new();
        let value = vec!["item1".to_string(), "item2".to_string()];

        cache.set(&key("hit", None), &value, 60).await;

        let retrieved: Option<Vec<String>> = cache.get(&key("hit", None)).await.unwrap();
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = Cache::new();
        let value = vec!["stale".to_string()];

        cache.set(&key("stale", None), &value, 0).await;

        let retrieved: Option<Vec<String>> = cache.get(&key("stale", None)).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_most_recent_write_wins() {
        let cache = Cache::new();

        cache.set(&key("k", None), &vec!["old".to_string()], 60).await;
        cache.set(&key("k", None), &vec!["new".to_string()], 60).await;

        let retrieved: Option<Vec<String>> = cache.get(&key("k", None)).await.unwrap();
        assert_eq!(retrieved, Some(vec!["new".to_string()]));
    }

    async fn compute_through_cache(
        cache: &Cache,
        calls: &AtomicUsize,
        outcome: AppResult<Vec<String>>,
    ) -> AppResult<Vec<String>> {
        cached!(cache, key("memo", None), 60, async {
            calls.fetch_add(1, Ordering::SeqCst);
            outcome
        })
    }

    #[tokio::test]
    async fn test_cached_macro_computes_once() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result =
                compute_through_cache(&cache, &calls, Ok(vec!["computed".to_string()])).await;
            assert_eq!(result.unwrap(), vec!["computed".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_macro_does_not_cache_errors() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);

        let result = compute_through_cache(
            &cache,
            &calls,
            Err(AppError::CatalogUnavailable("boom".to_string())),
        )
        .await;
        assert!(result.is_err());

        let result =
            compute_through_cache(&cache, &calls, Ok(vec!["recovered".to_string()])).await;
        assert_eq!(result.unwrap(), vec!["recovered".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
