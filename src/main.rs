use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use isaac_progress_backend::{
    AppState,
    cache::{KvStore, MemoryStore, RedisStore},
    config::Config,
    router::build_router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.steam_api_key.is_some() {
        tracing::info!("Running with a server-held Steam API key, caching enabled");
    } else {
        tracing::info!("No STEAM_API_KEY set, callers must supply their own key");
    }

    let store: Arc<dyn KvStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.clone()).expect("Failed to create Redis client");
            Arc::new(RedisStore::new(client))
        }
        None => {
            tracing::info!("No REDIS_URL set, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()
        .expect("Failed to build HTTP client");

    let state = AppState::new(config, store, http);
    let router = build_router(state.clone());

    // CORS is only needed when the page is served from a dev origin.
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
