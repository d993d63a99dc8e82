use serde::Deserialize;

/// Form body of `POST /profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub steamid: String,
}
