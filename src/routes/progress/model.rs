use serde::Deserialize;

/// Form body of `POST /progress`. Fields default to empty so missing input
/// reaches validation instead of a form-rejection.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    #[serde(default)]
    pub steamid: String,
    #[serde(default)]
    pub apikey: Option<String>,
}
