use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    http::StatusCode,
    response::Response,
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;
use tracing::info;

use crate::api::models::{HealthResponse, SubmitForm};
use crate::api::proxy::summarize_handler;
use crate::api::response;
use crate::ui::{render_page, LocalCompleter, SummaryForm};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Response {
    response::html(StatusCode::OK, render_page(&SummaryForm::new().view()))
}

/// Server-side round of the form: validate, summarize, render the outcome.
async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Response {
    let start_time = std::time::Instant::now();
    let mut summary_form = SummaryForm::with_input(form.input);
    let mut completer = LocalCompleter::new(&state.config);
    summary_form.submit(&mut completer).await;

    info!(phase = ?summary_form.phase(), elapsed = ?start_time.elapsed(), "Form submission handled");
    response::html(StatusCode::OK, render_page(&summary_form.view()))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
