use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Payload posted by the page to the proxy route.
#[derive(Deserialize, Serialize, Debug)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Urlencoded body of the server-rendered form.
#[derive(Deserialize, Debug, Default)]
pub struct SubmitForm {
    #[serde(default)]
    pub input: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
