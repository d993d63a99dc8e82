use std::net::SocketAddr;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Form, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, error::ProxyError, middleware::resolve_client_ip, steam::CredentialSource,
    utils::validate_steam_id,
};

use super::model::ProfileRequest;

/// Resolves a Steam ID to a trimmed public profile for the navbar. Needs the
/// server-held key; the caller-key variant has no business fetching profiles
/// on a stranger's behalf.
#[axum::debug_handler]
pub async fn fetch_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    Form(req): Form<ProfileRequest>,
) -> Result<Response, ProxyError> {
    validate_steam_id(&req.steamid)?;

    let ip = resolve_client_ip(&headers, connect_info.as_ref().map(|ext| &ext.0));
    let remaining = state.limiter.register(&ip).await?;

    // Past the rate check, every outcome carries the remaining quota.
    let outcome: Result<Response, ProxyError> = async {
        let CredentialSource::Server(key) = &state.credentials else {
            return Err(ProxyError::NotConfigured);
        };
        let summary = state.steam.fetch_player_summary(key, &req.steamid).await?;
        Ok(Json(summary).into_response())
    }
    .await;

    let mut response = outcome.unwrap_or_else(|e| e.into_response());
    response
        .headers_mut()
        .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    Ok(response)
}
