use std::future::Future;
use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::models::PromptRequest;
use crate::api::proxy;
use crate::config::Config;

pub const FETCH_FAILED: &str = "Failed to fetch the completion.";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Non-success response; carries the response text.
    #[error("{0}")]
    Response(String),

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Stream(String),
}

/// Anything that can turn a prompt into completion text.
pub trait Completer {
    fn complete(&mut self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// How the response body is decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamProtocol {
    /// The body is the completion, chunk after chunk.
    #[default]
    Text,
    /// Line protocol: `0:"text"` parts are appended, a `3:"message"` part is
    /// an error, anything else is ignored.
    Data,
}

pub type OnError = Arc<dyn Fn(&CompletionError) + Send + Sync>;

#[derive(Clone)]
pub struct CompletionOptions {
    pub api: String,
    pub stream_protocol: StreamProtocol,
    pub on_error: Option<OnError>,
}

impl CompletionOptions {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            stream_protocol: StreamProtocol::Text,
            on_error: None,
        }
    }

    pub fn stream_protocol(mut self, protocol: StreamProtocol) -> Self {
        self.stream_protocol = protocol;
        self
    }

    pub fn on_error(mut self, f: impl Fn(&CompletionError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }
}

/// HTTP completer: posts `{ "prompt": ... }` to `options.api` and reads the
/// answer incrementally, keeping the latest completion, loading flag and error.
pub struct Completion {
    client: Client,
    options: CompletionOptions,
    completion: String,
    is_loading: bool,
    error: Option<String>,
}

impl Completion {
    pub fn new(options: CompletionOptions) -> Self {
        Self {
            client: Client::new(),
            options,
            completion: String::new(),
            is_loading: false,
            error: None,
        }
    }

    pub fn completion(&self) -> &str {
        &self.completion
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    async fn request(&mut self, prompt: &str) -> Result<String, CompletionError> {
        self.completion.clear();
        self.error = None;

        let mut response = self
            .client
            .post(&self.options.api)
            .json(&PromptRequest { prompt: prompt.to_string() })
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() { FETCH_FAILED.to_string() } else { text };
            return Err(CompletionError::Response(message));
        }

        let mut decoder = Decoder::new(self.options.stream_protocol);
        while let Some(chunk) = response.chunk().await? {
            let text = decoder.push(&chunk)?;
            self.completion.push_str(&text);
        }
        let rest = decoder.finish()?;
        self.completion.push_str(&rest);

        debug!(chars = self.completion.len(), "Completion finished");
        Ok(self.completion.clone())
    }
}

impl Completer for Completion {
    async fn complete(&mut self, prompt: &str) -> Result<String, CompletionError> {
        self.is_loading = true;
        let result = self.request(prompt).await;
        self.is_loading = false;

        if let Err(err) = &result {
            warn!(error = %err, api = %self.options.api, "Completion failed");
            self.error = Some(err.to_string());
            if let Some(on_error) = &self.options.on_error {
                on_error(err);
            }
        }
        result
    }
}

/// Calls the proxy adapter in-process, so the server-rendered form gets
/// exactly what `/api/summarize` would have answered.
pub struct LocalCompleter<'a> {
    config: &'a Config,
}

impl<'a> LocalCompleter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Completer for LocalCompleter<'_> {
    async fn complete(&mut self, prompt: &str) -> Result<String, CompletionError> {
        proxy::summarize(self.config, prompt)
            .await
            .map_err(|err| CompletionError::Response(err.message()))
    }
}

/// Incremental body decoder. Bytes are held back until they form complete
/// UTF-8 (and, for the data protocol, complete lines).
struct Decoder {
    protocol: StreamProtocol,
    bytes: Vec<u8>,
    line: String,
}

impl Decoder {
    fn new(protocol: StreamProtocol) -> Self {
        Self { protocol, bytes: Vec::new(), line: String::new() }
    }

    fn push(&mut self, chunk: &[u8]) -> Result<String, CompletionError> {
        self.bytes.extend_from_slice(chunk);
        let text = self.take_utf8();

        match self.protocol {
            StreamProtocol::Text => Ok(text),
            StreamProtocol::Data => {
                self.line.push_str(&text);
                let mut out = String::new();
                while let Some(pos) = self.line.find('\n') {
                    let line: String = self.line.drain(..=pos).collect();
                    out.push_str(&decode_data_line(line.trim_end())?);
                }
                Ok(out)
            }
        }
    }

    /// Drains every complete character; invalid bytes become U+FFFD and only
    /// a sequence cut off at the end is kept for the next chunk.
    fn take_utf8(&mut self) -> String {
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.bytes) {
                Ok(s) => {
                    text.push_str(s);
                    self.bytes.clear();
                    return text;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.bytes[..valid]));
                    match e.error_len() {
                        Some(bad) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.bytes.drain(..valid + bad);
                        }
                        None => {
                            self.bytes.drain(..valid);
                            return text;
                        }
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Result<String, CompletionError> {
        let tail = String::from_utf8_lossy(&self.bytes).into_owned();
        match self.protocol {
            StreamProtocol::Text => Ok(tail),
            StreamProtocol::Data => {
                self.line.push_str(&tail);
                decode_data_line(self.line.trim_end())
            }
        }
    }
}

fn decode_data_line(line: &str) -> Result<String, CompletionError> {
    if line.is_empty() {
        return Ok(String::new());
    }
    let (code, payload) = line
        .split_once(':')
        .ok_or_else(|| CompletionError::Stream(format!("Failed to parse stream line: {line}")))?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| CompletionError::Stream(format!("Failed to parse stream part: {e}")))?;

    match (code, value) {
        ("0", Value::String(text)) => Ok(text),
        ("3", Value::String(message)) => Err(CompletionError::Stream(message)),
        ("0" | "3", other) => Err(CompletionError::Stream(format!("Unexpected stream part: {other}"))),
        _ => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_protocol_passes_chunks_through() {
        let mut decoder = Decoder::new(StreamProtocol::Text);
        assert_eq!(decoder.push(b"Hello, ").unwrap(), "Hello, ");
        assert_eq!(decoder.push(b"world").unwrap(), "world");
        assert_eq!(decoder.finish().unwrap(), "");
    }

    #[test]
    fn split_multibyte_characters_are_held_back() {
        let bytes = "Generating…".as_bytes();
        let (head, tail) = bytes.split_at(bytes.len() - 1);
        let mut decoder = Decoder::new(StreamProtocol::Text);
        assert_eq!(decoder.push(head).unwrap(), "Generating");
        assert_eq!(decoder.push(tail).unwrap(), "…");
    }

    #[test]
    fn invalid_bytes_do_not_stall_later_chunks() {
        let mut decoder = Decoder::new(StreamProtocol::Text);
        assert_eq!(decoder.push(b"ab\xffcd").unwrap(), "ab\u{FFFD}cd");
        assert_eq!(decoder.push(b"ef").unwrap(), "ef");
        assert_eq!(decoder.finish().unwrap(), "");
    }

    #[test]
    fn data_protocol_collects_text_parts_across_chunks() {
        let mut decoder = Decoder::new(StreamProtocol::Data);
        let mut out = decoder.push(b"0:\"Hel").unwrap();
        out += &decoder.push(b"lo\"\n2:[{\"x\":1}]\n0:\" there\"").unwrap();
        out += &decoder.finish().unwrap();
        assert_eq!(out, "Hello there");
    }

    #[test]
    fn data_protocol_error_part_fails() {
        let mut decoder = Decoder::new(StreamProtocol::Data);
        let err = decoder.push(b"0:\"partial\"\n3:\"model overloaded\"\n").unwrap_err();
        assert!(matches!(err, CompletionError::Stream(msg) if msg == "model overloaded"));
    }

    #[test]
    fn data_protocol_rejects_garbage_lines() {
        let mut decoder = Decoder::new(StreamProtocol::Data);
        assert!(decoder.push(b"just some text\n").is_err());
    }

    #[test]
    fn options_builder_sets_fields() {
        let options = CompletionOptions::new("/api/summarize")
            .stream_protocol(StreamProtocol::Data)
            .on_error(|_| {});
        assert_eq!(options.api, "/api/summarize");
        assert_eq!(options.stream_protocol, StreamProtocol::Data);
        assert!(options.on_error.is_some());
    }
}
