use crate::cache::models::{CachedProgress, RateLimitRecord};
use crate::cache::store::{KvStore, StoreError};

/// Achievement payload cache. Only the server-key variant writes here; a
/// caller-supplied key is neither trusted nor stable enough to cache under.
pub struct ProgressCacheOperations;

impl ProgressCacheOperations {
    /// Returns the cached payload and its age in seconds, or `None` when the
    /// entry is missing or has outlived the TTL.
    pub async fn lookup(
        store: &dyn KvStore,
        key: &str,
        ttl_secs: u64,
        now: i64,
    ) -> Result<Option<(String, u64)>, StoreError> {
        let Some(json) = store.get(key).await? else {
            return Ok(None);
        };
        let entry: CachedProgress = serde_json::from_str(&json)?;

        let age = now.saturating_sub(entry.created_at);
        if age < 0 || age as u64 >= ttl_secs {
            return Ok(None);
        }
        Ok(Some((entry.payload, age as u64)))
    }

    pub async fn store(
        store: &dyn KvStore,
        key: &str,
        payload: &str,
        now: i64,
        ttl_secs: u64,
    ) -> Result<(), StoreError> {
        let entry = CachedProgress {
            payload: payload.to_string(),
            created_at: now,
        };
        let json = serde_json::to_string(&entry)?;
        store.set_ex(key, &json, ttl_secs).await
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitOutcome {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// Sliding-window limiter over the injected store. Two concurrent requests
/// can both read the same record and both proceed; the bound is best-effort.
pub struct RateLimitOperations;

impl RateLimitOperations {
    pub async fn register_request(
        store: &dyn KvStore,
        key: &str,
        now: i64,
        window_secs: u64,
        max_requests: u32,
    ) -> Result<RateLimitOutcome, StoreError> {
        let mut record = match store.get(key).await? {
            Some(json) => serde_json::from_str::<RateLimitRecord>(&json)?,
            None => RateLimitRecord::default(),
        };

        // Purge timestamps outside the trailing window before counting.
        record
            .timestamps
            .retain(|t| now.saturating_sub(*t) < window_secs as i64);

        if record.timestamps.len() >= max_requests as usize {
            let oldest = record.timestamps.iter().copied().min().unwrap_or(now);
            let retry_after = (window_secs as i64 - now.saturating_sub(oldest)).max(1) as u64;
            return Ok(RateLimitOutcome::Limited {
                retry_after_secs: retry_after,
            });
        }

        record.timestamps.push(now);
        let json = serde_json::to_string(&record)?;
        store.set_ex(key, &json, window_secs).await?;

        let remaining = max_requests.saturating_sub(record.timestamps.len() as u32);
        Ok(RateLimitOutcome::Allowed { remaining })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;

    const WINDOW: u64 = 60;
    const MAX: u32 = 10;

    #[tokio::test]
    async fn requests_under_the_limit_are_allowed() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        for i in 0..MAX {
            let outcome = RateLimitOperations::register_request(&store, "k", now, WINDOW, MAX)
                .await
                .unwrap();
            assert_eq!(outcome, RateLimitOutcome::Allowed { remaining: MAX - i - 1 });
        }
    }

    #[tokio::test]
    async fn request_past_the_limit_reports_retry_after() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        for _ in 0..MAX {
            RateLimitOperations::register_request(&store, "k", now, WINDOW, MAX)
                .await
                .unwrap();
        }
        let outcome = RateLimitOperations::register_request(&store, "k", now + 10, WINDOW, MAX)
            .await
            .unwrap();
        match outcome {
            RateLimitOutcome::Limited { retry_after_secs } => {
                assert_eq!(retry_after_secs, WINDOW - 10);
            }
            other => panic!("expected limited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn retry_after_never_drops_below_one_second() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        for _ in 0..MAX {
            RateLimitOperations::register_request(&store, "k", now, WINDOW, MAX)
                .await
                .unwrap();
        }
        let outcome =
            RateLimitOperations::register_request(&store, "k", now + WINDOW as i64 - 1, WINDOW, MAX)
                .await
                .unwrap();
        assert_eq!(outcome, RateLimitOutcome::Limited { retry_after_secs: 1 });
    }

    #[tokio::test]
    async fn limit_clears_once_the_window_passes() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        for _ in 0..MAX {
            RateLimitOperations::register_request(&store, "k", now, WINDOW, MAX)
                .await
                .unwrap();
        }
        let outcome =
            RateLimitOperations::register_request(&store, "k", now + WINDOW as i64, WINDOW, MAX)
                .await
                .unwrap();
        assert_eq!(outcome, RateLimitOutcome::Allowed { remaining: MAX - 1 });
    }

    #[tokio::test]
    async fn separate_keys_do_not_share_a_budget() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        for _ in 0..MAX {
            RateLimitOperations::register_request(&store, "a", now, WINDOW, MAX)
                .await
                .unwrap();
        }
        let outcome = RateLimitOperations::register_request(&store, "b", now, WINDOW, MAX)
            .await
            .unwrap();
        assert_eq!(outcome, RateLimitOutcome::Allowed { remaining: MAX - 1 });
    }

    #[tokio::test]
    async fn fresh_cache_entry_is_served_with_its_age() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        ProgressCacheOperations::store(&store, "p", r#"{"playerstats":{}}"#, now - 120, 300)
            .await
            .unwrap();
        let hit = ProgressCacheOperations::lookup(&store, "p", 300, now)
            .await
            .unwrap();
        assert_eq!(hit, Some((r#"{"playerstats":{}}"#.to_string(), 120)));
    }

    #[tokio::test]
    async fn stale_cache_entry_is_never_served() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();

        ProgressCacheOperations::store(&store, "p", "{}", now - 300, 600)
            .await
            .unwrap();
        // Store TTL has not fired yet, but the entry is older than the cache
        // TTL and must be treated as a miss.
        let hit = ProgressCacheOperations::lookup(&store, "p", 300, now)
            .await
            .unwrap();
        assert_eq!(hit, None);
    }

    #[tokio::test]
    async fn missing_cache_entry_is_a_miss() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().timestamp();
        let hit = ProgressCacheOperations::lookup(&store, "p", 300, now)
            .await
            .unwrap();
        assert_eq!(hit, None);
    }
}
