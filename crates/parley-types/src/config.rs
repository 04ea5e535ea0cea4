//! Server configuration types for Parley.
//!
//! `ServerConfig` is the optional `parley.toml` file. Every field has a
//! default, so an empty file (or no file) yields a working local setup.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Model used when a chat request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Minimum seconds between two provider requests (0 disables).
    #[serde(default = "default_rate_limit_secs")]
    pub rate_limit_secs: f64,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory served under `/static` when it exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_rate_limit_secs() -> f64 {
    0.5
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_model: default_model(),
            rate_limit_secs: default_rate_limit_secs(),
            gemini_base_url: default_gemini_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Socket address string (`host:port`) to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
