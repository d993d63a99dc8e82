use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ProxyError;

/// Where the upstream key comes from, decided once at startup. The server
/// variant is the only one allowed to cache, and the only one whose
/// credential failures must stay opaque to the caller.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Server(String),
    PerRequest,
}

impl CredentialSource {
    pub fn from_config(config: &Config) -> Self {
        match &config.steam_api_key {
            Some(key) => CredentialSource::Server(key.clone()),
            None => CredentialSource::PerRequest,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, CredentialSource::Server(_))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    pub personaname: String,
    pub avatar: String,
    pub avatarmedium: String,
    pub profileurl: String,
}

#[derive(Deserialize)]
struct PlayerSummariesEnvelope {
    response: PlayerSummariesResponse,
}

#[derive(Deserialize)]
struct PlayerSummariesResponse {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    base: String,
    app_id: u32,
}

impl SteamClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base: config.steam_api_base.trim_end_matches('/').to_string(),
            app_id: config.steam_app_id,
        }
    }

    /// Fetches the raw `GetUserStatsForGame` payload. `caller_supplied` picks
    /// which side of the credential-failure translation applies.
    pub async fn fetch_player_stats(
        &self,
        key: &str,
        steam_id: &str,
        caller_supplied: bool,
    ) -> Result<String, ProxyError> {
        let url = format!(
            "{}/ISteamUserStats/GetUserStatsForGame/v0002/",
            self.base
        );
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", key),
                ("steamid", steam_id),
                ("appid", &self.app_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Steam stats request failed: {}", e);
                ProxyError::UpstreamUnreachable
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(translate_error_status(status, caller_supplied));
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!("Failed to read Steam stats response: {}", e);
            ProxyError::UpstreamUnreachable
        })?;
        classify_stats_payload(&body)?;
        Ok(body)
    }

    /// Fetches and trims a public profile via `GetPlayerSummaries`.
    pub async fn fetch_player_summary(
        &self,
        key: &str,
        steam_id: &str,
    ) -> Result<PlayerSummary, ProxyError> {
        let url = format!("{}/ISteamUser/GetPlayerSummaries/v2/", self.base);
        let response = self
            .http
            .get(&url)
            .query(&[("key", key), ("steamids", steam_id)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Steam profile request failed: {}", e);
                ProxyError::UpstreamUnreachable
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Steam profile request returned HTTP {}", status.as_u16());
            return Err(ProxyError::Upstream(status.as_u16()));
        }

        let envelope: PlayerSummariesEnvelope = response
            .json()
            .await
            .map_err(|_| ProxyError::MalformedUpstreamResponse)?;
        envelope
            .response
            .players
            .into_iter()
            .next()
            .ok_or(ProxyError::ProfileNotFound)
    }
}

/// Deterministic mapping of non-200 upstream statuses. When the server holds
/// the key, 401/403 point at our own configuration and the caller only sees
/// a generic failure.
fn translate_error_status(status: StatusCode, caller_supplied: bool) -> ProxyError {
    match status {
        StatusCode::UNAUTHORIZED if caller_supplied => ProxyError::InvalidCredential,
        StatusCode::FORBIDDEN if caller_supplied => ProxyError::AccessDenied,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::error!(
                "Steam rejected the server-held API key (HTTP {})",
                status.as_u16()
            );
            ProxyError::UpstreamMisconfigured
        }
        StatusCode::INTERNAL_SERVER_ERROR => ProxyError::UpstreamUnavailable,
        other => ProxyError::Upstream(other.as_u16()),
    }
}

/// Rejects payloads that parse but carry no usable achievement data. The
/// caller passes the raw body through untouched on success.
pub fn classify_stats_payload(body: &str) -> Result<(), ProxyError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ProxyError::MalformedUpstreamResponse)?;
    // A null playerstats carries no more data than a missing one.
    let stats = match value.get("playerstats") {
        Some(stats) if !stats.is_null() => stats,
        _ => return Err(ProxyError::NoAchievementData),
    };
    match stats.get("achievements").and_then(|a| a.as_array()) {
        Some(list) if !list.is_empty() => Ok(()),
        _ => Err(ProxyError::NoAchievementsFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_key_rejections_stay_opaque() {
        assert_eq!(
            translate_error_status(StatusCode::UNAUTHORIZED, false),
            ProxyError::UpstreamMisconfigured
        );
        assert_eq!(
            translate_error_status(StatusCode::FORBIDDEN, false),
            ProxyError::UpstreamMisconfigured
        );
    }

    #[test]
    fn caller_key_rejections_are_actionable() {
        assert_eq!(
            translate_error_status(StatusCode::UNAUTHORIZED, true),
            ProxyError::InvalidCredential
        );
        assert_eq!(
            translate_error_status(StatusCode::FORBIDDEN, true),
            ProxyError::AccessDenied
        );
    }

    #[test]
    fn upstream_500_and_other_codes_translate() {
        assert_eq!(
            translate_error_status(StatusCode::INTERNAL_SERVER_ERROR, true),
            ProxyError::UpstreamUnavailable
        );
        assert_eq!(
            translate_error_status(StatusCode::BAD_GATEWAY, false),
            ProxyError::Upstream(502)
        );
    }

    #[test]
    fn payload_classification_covers_every_shape() {
        assert_eq!(
            classify_stats_payload("not json"),
            Err(ProxyError::MalformedUpstreamResponse)
        );
        assert_eq!(
            classify_stats_payload("{}"),
            Err(ProxyError::NoAchievementData)
        );
        assert_eq!(
            classify_stats_payload(r#"{"playerstats":null}"#),
            Err(ProxyError::NoAchievementData)
        );
        assert_eq!(
            classify_stats_payload(r#"{"playerstats":{"steamID":"x"}}"#),
            Err(ProxyError::NoAchievementsFound)
        );
        assert_eq!(
            classify_stats_payload(r#"{"playerstats":{"achievements":[]}}"#),
            Err(ProxyError::NoAchievementsFound)
        );
        assert_eq!(
            classify_stats_payload(
                r#"{"playerstats":{"achievements":[{"name":"a1","achieved":1}]}}"#
            ),
            Ok(())
        );
    }
}
