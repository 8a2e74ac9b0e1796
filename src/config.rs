use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tracing::warn;
use crate::error::{AppError, Result};

pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub backend_base_url: String,
    pub dev_jwt_token: String,
}

impl Config {
    /// Reads the process environment. `.env` is loaded by `main` beforehand.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source so tests
    /// don't have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_base_url = lookup("BACKEND_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_BASE_URL.to_string());
        let dev_jwt_token = lookup("DEV_JWT_TOKEN").unwrap_or_default();

        if dev_jwt_token.is_empty() {
            warn!("DEV_JWT_TOKEN is not set, backend requests will carry an empty bearer token");
        }

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            backend_base_url,
            dev_jwt_token,
        })
    }

    pub fn summarize_url(&self) -> String {
        format!("{}/summarize", self.backend_base_url.trim_end_matches('/'))
    }
}
