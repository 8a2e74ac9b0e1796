#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use summarize_ui::{api::routes::create_router, config::Config, AppState};

/// What the fake backend saw for one request.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct BackendState {
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct FakeBackend {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Starts a backend whose `/summarize` always answers `status` with `body`.
pub async fn spawn_backend(status: u16, body: &'static str) -> FakeBackend {
    spawn_backend_with_type(status, "application/json", body).await
}

pub async fn spawn_backend_with_type(status: u16, content_type: &'static str, body: &'static str) -> FakeBackend {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        status: StatusCode::from_u16(status).unwrap(),
        content_type,
        body,
        calls: calls.clone(),
    };
    let app = Router::new()
        .route("/summarize", post(fake_summarize))
        .with_state(state);
    let base_url = serve(app).await;
    FakeBackend { base_url, calls }
}

async fn fake_summarize(State(state): State<BackendState>, headers: HeaderMap, body: Bytes) -> Response {
    let header_text = |name: header::HeaderName| {
        headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
    };
    state.calls.lock().unwrap().push(RecordedCall {
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    (state.status, [(header::CONTENT_TYPE, state.content_type)], state.body).into_response()
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config_for(backend_base_url: &str, token: &str) -> Config {
    let backend_base_url = backend_base_url.to_string();
    let token = token.to_string();
    Config::from_lookup(move |key| match key {
        "BACKEND_BASE_URL" => Some(backend_base_url.clone()),
        "DEV_JWT_TOKEN" => Some(token.clone()),
        _ => None,
    })
    .unwrap()
}

/// Starts the front-end against the given backend and returns its base URL.
pub async fn spawn_app(backend_base_url: &str, token: &str) -> String {
    let app = create_router(AppState::new(config_for(backend_base_url, token)));
    serve(app).await
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Starts a backend that answers with `status_line`, promises a 100 byte JSON
/// body, sends a few bytes of it and hangs up.
pub async fn spawn_truncated_backend(status_line: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else { return };
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let head = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{{\"summ"
                );
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.flush().await;
                let _ = stream.shutdown().await;
            });
        }
    });

    // Reads headers and the declared body so the client is done sending.
    async fn read_request(stream: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let Ok(n) = stream.read(&mut chunk).await else { return };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else { continue };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    format!("http://{addr}")
}
