// Cache and rate-limit storage.
// Keys are content-addressed hashes; values are small JSON documents.

pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

pub use operations::{ProgressCacheOperations, RateLimitOperations, RateLimitOutcome};
pub use store::{KvStore, MemoryStore, RedisStore};
