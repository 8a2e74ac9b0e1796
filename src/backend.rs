use axum::http::StatusCode;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Word budget requested from the backend for every summary.
pub const MAX_LENGTH: u32 = 100;

pub const BACKEND_REQUEST_FAILED: &str = "Backend request failed";

// Shared client so connections to the backend are pooled across requests.
// No timeout: the transport default applies.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Serialize, Debug)]
pub struct SummarizeRequest<'a> {
    pub text: &'a str,
    pub max_length: u32,
}

/// Sends one summarization request and normalizes the backend's answer.
///
/// `prompt` must already be trimmed and non-empty. A success yields the
/// `summary` text (empty when the backend did not send a string); a non-success
/// status yields [`AppError::Backend`] carrying the backend's status.
pub async fn forward(config: &Config, prompt: &str) -> Result<String> {
    let url = config.summarize_url();
    debug!(%url, chars = prompt.len(), "Forwarding prompt to backend");

    let res = CLIENT
        .post(&url)
        .bearer_auth(&config.dev_jwt_token)
        .json(&SummarizeRequest {
            text: prompt,
            max_length: MAX_LENGTH,
        })
        .send()
        .await?;

    let status = res.status();
    // A body that breaks off mid-read counts as empty; the status still stands.
    let bytes = match res.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "Failed to read backend body");
            Default::default()
        }
    };
    let data = parse_body(&bytes);

    if !status.is_success() {
        let message = error_message(&data);
        warn!(status = status.as_u16(), %message, "Backend returned an error");
        // reqwest and axum sit on different `http` versions.
        let status = StatusCode::from_u16(status.as_u16())
            .map_err(|e| AppError::Transport(e.to_string()))?;
        return Err(AppError::Backend { status, message });
    }

    Ok(summary_text(&data))
}

/// Unparseable bodies count as an empty object.
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// Picks the most specific message out of an error body: a string `detail`,
/// then `detail.error`, then a top-level `error`.
pub fn error_message(data: &Value) -> String {
    let detail = data.get("detail");

    if let Some(Value::String(detail)) = detail {
        return detail.clone();
    }

    detail
        .filter(|d| d.is_object())
        .and_then(|d| present(d.get("error")))
        .or_else(|| present(data.get("error")))
        .unwrap_or_else(|| BACKEND_REQUEST_FAILED.to_string())
}

pub fn summary_text(data: &Value) -> String {
    data.get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// Strings are taken as-is, other non-null values as their JSON text.
fn present(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
