use axum::Json;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Everything a request can fail with, in the order a request moves through
/// the pipeline: local rejections first, then upstream translations.
#[derive(Debug, PartialEq, Eq)]
pub enum ProxyError {
    Validation(String),
    RateLimited { retry_after_secs: u64 },
    /// Caller-key variant is active and the endpoint needs a server-side key.
    NotConfigured,
    /// Cache or rate-limit store failure. Detail is logged where it happens.
    Store,
    UpstreamUnreachable,
    /// Steam rejected the server-held key. The client message must not hint
    /// at a credential problem; the real cause is logged internally.
    UpstreamMisconfigured,
    InvalidCredential,
    AccessDenied,
    UpstreamUnavailable,
    Upstream(u16),
    MalformedUpstreamResponse,
    NoAchievementData,
    NoAchievementsFound,
    ProfileNotFound,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Store => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::UpstreamUnreachable => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::UpstreamMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ProxyError::AccessDenied => StatusCode::FORBIDDEN,
            ProxyError::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            // Pass the upstream code through when it is a representable
            // status, otherwise report a bad gateway.
            ProxyError::Upstream(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::MalformedUpstreamResponse => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::NoAchievementData => StatusCode::NOT_FOUND,
            ProxyError::NoAchievementsFound => StatusCode::NOT_FOUND,
            ProxyError::ProfileNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ProxyError::Validation(msg) => msg.clone(),
            ProxyError::RateLimited { retry_after_secs } => format!(
                "Too many requests. Please wait {} seconds before trying again.",
                retry_after_secs
            ),
            ProxyError::NotConfigured => {
                "The tracker is not configured with a Steam Web API key.".into()
            }
            ProxyError::Store => "Internal server error. Please try again later.".into(),
            ProxyError::UpstreamUnreachable => {
                "Failed to connect to Steam API. Please try again later.".into()
            }
            ProxyError::UpstreamMisconfigured => {
                "The tracker is temporarily unable to talk to Steam. Please try again later.".into()
            }
            ProxyError::InvalidCredential => {
                "Invalid Steam API Key. Please check your key at steamcommunity.com/dev/apikey"
                    .into()
            }
            ProxyError::AccessDenied => {
                "Access denied. Make sure your Steam profile and game details are set to public."
                    .into()
            }
            ProxyError::UpstreamUnavailable => {
                "Steam API is currently unavailable. Please try again later.".into()
            }
            ProxyError::Upstream(code) => format!(
                "Steam API returned an unexpected error (HTTP {}). Please try again later.",
                code
            ),
            ProxyError::MalformedUpstreamResponse => {
                "Failed to parse Steam API response. Please try again later.".into()
            }
            ProxyError::NoAchievementData => {
                "No achievement data found. This could mean: the Steam ID is invalid, \
                 the profile is private, or the game is not owned."
                    .into()
            }
            ProxyError::NoAchievementsFound => {
                "No achievements found for this game. Make sure you own \
                 The Binding of Isaac: Rebirth and have played it at least once."
                    .into()
            }
            ProxyError::ProfileNotFound => "Steam profile not found.".into(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message(),
        });
        let mut response = (self.status(), body).into_response();

        if let ProxyError::RateLimited { retry_after_secs } = self {
            let headers = response.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                headers.insert(header::RETRY_AFTER, value);
            }
            headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        }

        response
    }
}
