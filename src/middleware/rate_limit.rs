use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;

use crate::cache::{KvStore, RateLimitOperations, RateLimitOutcome, keys};
use crate::config::Config;
use crate::error::ProxyError;

/// Per-IP sliding-window limiter over the injected store. Checked after
/// input validation and before any cache or upstream access; the record is
/// mutated even when the request later fails upstream.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>, config: &Config) -> Self {
        Self {
            store,
            window_secs: config.rate_limit_window_secs,
            max_requests: config.rate_limit_requests,
        }
    }

    /// Registers one request for `ip`. Returns the remaining quota, or the
    /// rate-limit rejection with its retry delay.
    pub async fn register(&self, ip: &str) -> Result<u32, ProxyError> {
        let key = keys::rate_limit_key(ip);
        let now = chrono::Utc::now().timestamp();

        let outcome = RateLimitOperations::register_request(
            self.store.as_ref(),
            &key,
            now,
            self.window_secs,
            self.max_requests,
        )
        .await
        .map_err(|e| {
            tracing::error!("Rate-limit store failure: {}", e);
            ProxyError::Store
        })?;

        match outcome {
            RateLimitOutcome::Allowed { remaining } => Ok(remaining),
            RateLimitOutcome::Limited { retry_after_secs } => {
                tracing::debug!("Rate limited {} for {}s", ip, retry_after_secs);
                Err(ProxyError::RateLimited { retry_after_secs })
            }
        }
    }
}

/// Resolves the client address from proxy headers, falling back to the
/// connection peer.
pub fn resolve_client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    let remote_ip = connect_info.map(|ci| ci.0.ip().to_string());

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn real_ip_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(resolve_client_ip(&headers, None), "198.51.100.4");
    }

    #[test]
    fn forwarded_for_takes_first_non_empty_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9, 198.51.100.4"),
        );
        assert_eq!(resolve_client_ip(&headers, None), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_connection_address_then_unknown() {
        let headers = HeaderMap::new();
        let peer = ConnectInfo("192.0.2.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(resolve_client_ip(&headers, Some(&peer)), "192.0.2.1");
        assert_eq!(resolve_client_ip(&headers, None), "unknown");
    }
}
