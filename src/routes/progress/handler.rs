use std::net::SocketAddr;

use axum::{
    Extension,
    extract::{ConnectInfo, Form, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    cache::{ProgressCacheOperations, keys},
    error::ProxyError,
    middleware::resolve_client_ip,
    steam::CredentialSource,
    utils::{validate_api_key, validate_steam_id},
};

use super::model::ProgressRequest;

/// The achievement proxy pipeline: validate, rate-check, cache, fetch,
/// translate, cache-write. The upstream payload passes through verbatim.
#[axum::debug_handler]
pub async fn fetch_progress(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    Form(req): Form<ProgressRequest>,
) -> Result<Response, ProxyError> {
    validate_steam_id(&req.steamid)?;

    let (key, caller_supplied) = match &state.credentials {
        CredentialSource::Server(server_key) => (server_key.clone(), false),
        CredentialSource::PerRequest => {
            let supplied = req.apikey.as_deref().unwrap_or("");
            validate_api_key(supplied)?;
            (supplied.to_string(), true)
        }
    };

    let ip = resolve_client_ip(&headers, connect_info.as_ref().map(|ext| &ext.0));
    let remaining = state.limiter.register(&ip).await?;

    let now = chrono::Utc::now().timestamp();
    let cache_key = keys::progress_key(&req.steamid, state.config.steam_app_id);

    // Past the rate check, every outcome carries the remaining quota.
    let outcome: Result<Response, ProxyError> = async {
        // Only the server-key variant caches; a caller-supplied key is not a
        // stable cache dimension.
        if !caller_supplied {
            let hit = ProgressCacheOperations::lookup(
                state.store.as_ref(),
                &cache_key,
                state.config.cache_ttl_secs,
                now,
            )
            .await
            .map_err(|e| {
                tracing::error!("Cache lookup failure: {}", e);
                ProxyError::Store
            })?;

            if let Some((payload, age)) = hit {
                return json_passthrough(payload, CacheStatus::Hit { age_secs: age });
            }
        }

        let payload = state
            .steam
            .fetch_player_stats(&key, &req.steamid, caller_supplied)
            .await?;

        if !caller_supplied {
            // The payload is already in hand; a failed cache write degrades
            // the next request, not this one.
            if let Err(e) = ProgressCacheOperations::store(
                state.store.as_ref(),
                &cache_key,
                &payload,
                now,
                state.config.cache_ttl_secs,
            )
            .await
            {
                tracing::warn!("Cache write failure: {}", e);
            }
        }

        json_passthrough(payload, CacheStatus::Miss)
    }
    .await;

    let mut response = outcome.unwrap_or_else(|e| e.into_response());
    response
        .headers_mut()
        .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    Ok(response)
}

enum CacheStatus {
    Hit { age_secs: u64 },
    Miss,
}

fn json_passthrough(payload: String, cache: CacheStatus) -> Result<Response, ProxyError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json");

    builder = match cache {
        CacheStatus::Hit { age_secs } => builder
            .header("x-cache", HeaderValue::from_static("HIT"))
            .header("x-cache-age", age_secs),
        CacheStatus::Miss => builder.header("x-cache", HeaderValue::from_static("MISS")),
    };

    builder.body(payload.into()).map_err(|e| {
        tracing::error!("Failed to build response: {}", e);
        ProxyError::Store
    })
}
