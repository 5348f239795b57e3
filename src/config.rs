// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default interval between reachability probes.
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 10;
/// Default connect/read/write ceiling for the shared HTTP transport.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Default number of retries for non-2xx responses.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default linear backoff step between retries.
pub const DEFAULT_RETRY_STEP_MS: u64 = 1000;
pub const DEFAULT_USER_AGENT: &str = "RehabPlatform-Client/1.0";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// API root; endpoint paths are joined onto it.
    pub api_base_url: String,
    /// Location of the durable session record.
    pub session_path: PathBuf,
    /// Pause between two reachability probes.
    pub probe_interval: Duration,
    /// Applied to connect and whole-request timeouts.
    pub http_timeout: Duration,
    pub max_retries: u32,
    pub retry_step: Duration,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mut api_base_url = env::var("REHAB_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("REHAB_API_BASE_URL"))?;
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        Ok(Self {
            api_base_url,
            session_path: env::var("REHAB_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("rehab_session.json")),
            probe_interval: Duration::from_secs(parse_var(
                "REHAB_PROBE_INTERVAL_SECS",
                DEFAULT_PROBE_INTERVAL_SECS,
            )?),
            http_timeout: Duration::from_secs(parse_var(
                "REHAB_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            max_retries: parse_var("REHAB_HTTP_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            retry_step: Duration::from_millis(parse_var(
                "REHAB_HTTP_RETRY_STEP_MS",
                DEFAULT_RETRY_STEP_MS,
            )?),
            user_agent: env::var("REHAB_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Config for tests: local backend, no retry delay.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000/api/".to_string(),
            session_path: PathBuf::from("test_session.json"),
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
            http_timeout: Duration::from_secs(5),
            max_retries: 0,
            retry_step: Duration::from_millis(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Same config pointed at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        if !self.api_base_url.ends_with('/') {
            self.api_base_url.push('/');
        }
        self
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
