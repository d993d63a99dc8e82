use std::sync::Arc;

use cache::KvStore;
use config::Config;
use middleware::RateLimiter;
use steam::{CredentialSource, SteamClient};

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod steam;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn KvStore>,
    pub steam: SteamClient,
    pub credentials: CredentialSource,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KvStore>, http: reqwest::Client) -> Self {
        let steam = SteamClient::new(http, &config);
        let credentials = CredentialSource::from_config(&config);
        let limiter = RateLimiter::new(store.clone(), &config);
        AppState {
            config,
            store,
            steam,
            credentials,
            limiter,
        }
    }
}
