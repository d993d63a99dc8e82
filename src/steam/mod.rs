// Upstream Steam Web API client and response translation.

mod client;

pub use client::{CredentialSource, PlayerSummary, SteamClient, classify_stats_payload};
