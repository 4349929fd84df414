use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub ack_window: Duration,
    pub session_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            ack_window: Duration::from_secs(5),
            session_dir: PathBuf::from(".eventra"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api_url: lookup("EVENTRA_API_URL").unwrap_or(defaults.api_url),
            request_timeout: match lookup("EVENTRA_REQUEST_TIMEOUT_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.trim()
                        .parse()
                        .context("EVENTRA_REQUEST_TIMEOUT_SECS must be a valid number")?,
                ),
                None => defaults.request_timeout,
            },
            ack_window: match lookup("EVENTRA_ACK_WINDOW_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.trim()
                        .parse()
                        .context("EVENTRA_ACK_WINDOW_SECS must be a valid number")?,
                ),
                None => defaults.ack_window,
            },
            session_dir: lookup("EVENTRA_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
        })
    }
}
