use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::response;
use crate::backend;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::AppState;

/// `POST /api/summarize`: relays `{ "prompt": ... }` to the backend and
/// answers with plain text whatever happens.
pub async fn summarize_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let start_time = std::time::Instant::now();

    let result = match prompt_from_body(&body) {
        Ok(Some(prompt)) => summarize(&state.config, &prompt).await,
        Ok(None) => Err(AppError::Validation),
        Err(err) => Err(err),
    };

    let elapsed = start_time.elapsed();
    match result {
        Ok(summary) => {
            info!(?elapsed, chars = summary.len(), "Summary relayed");
            response::plain_text(StatusCode::OK, summary)
        }
        Err(err) => {
            match &err {
                AppError::Validation => warn!("Rejected empty prompt"),
                AppError::Backend { status, .. } => warn!(status = status.as_u16(), ?elapsed, "Backend error relayed"),
                other => error!(error = %other, ?elapsed, "Summarize request failed"),
            }
            err.into_response()
        }
    }
}

/// Trims and validates `prompt`, then forwards it. Empty prompts never leave
/// the process.
pub async fn summarize(config: &Config, prompt: &str) -> Result<String> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation);
    }
    backend::forward(config, prompt).await
}

/// Reads the inbound JSON body. Malformed JSON is an error; a body without a
/// string `prompt` (or one that trims to nothing) yields `None`.
pub fn prompt_from_body(bytes: &[u8]) -> Result<Option<String>> {
    let body: Value = serde_json::from_slice(bytes)?;
    let prompt = body
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    Ok(prompt)
}
