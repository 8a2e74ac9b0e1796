use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

pub fn plain_text(status: StatusCode, body: impl Into<String>) -> Response {
    let body: String = body.into();
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body).into_response()
}

pub fn html(status: StatusCode, page: String) -> Response {
    (status, Html(page)).into_response()
}
