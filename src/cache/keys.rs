use sha2::{Digest, Sha256};

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cache key for a player's achievement payload for one app.
pub fn progress_key(steam_id: &str, app_id: u32) -> String {
    format!("progress:{}", sha256_hex(&format!("{}{}", steam_id, app_id)))
}

/// Rate-limit key for a client IP. Hashed so raw addresses never reach the
/// store.
pub fn rate_limit_key(ip: &str) -> String {
    format!("rate_limit:{}", sha256_hex(ip))
}
