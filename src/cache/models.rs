use serde::{Deserialize, Serialize};

/// Raw upstream achievement payload plus its creation time. An entry is
/// served only while `now - created_at` stays below the configured TTL.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedProgress {
    pub payload: String,
    pub created_at: i64, // Unix timestamp
}

/// Request timestamps for one client inside the trailing rate-limit window.
/// Stale timestamps are purged before every count check.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct RateLimitRecord {
    pub timestamps: Vec<i64>,
}
