use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Text is required")]
    Validation,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation => StatusCode::BAD_REQUEST,
            AppError::Backend { status, .. } => *status,
            AppError::Transport(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent back to the caller.
    pub fn message(&self) -> String {
        match self {
            AppError::Transport(msg) if msg.trim().is_empty() => INTERNAL_SERVER_ERROR.to_string(),
            AppError::Transport(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::plain_text(self.status(), self.message())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
