// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform REST API client.
//!
//! Handles:
//! - Bearer token injection from the session
//! - Linear-backoff retry of non-2xx responses
//! - Auth, profile and catalog endpoints
//! - Reachability probing (status code only)

use super::{AuthToken, RetryPolicy};
use crate::config::Config;
use crate::connectivity::{Probe, ProbeFailure, ProbeOutcome};
use crate::error::AppError;
use crate::models::{
    AuthResponse, Category, ErrorBody, LoginRequest, ProfileUpdate, RegisterRequest, User,
};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

mod paths {
    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const CURRENT_USER: &str = "users/me";
    /// Cheap, bodyless GET; doubles as the reachability probe.
    pub const CATEGORIES: &str = "categories";
}

/// Platform API client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: AuthToken,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Build the shared transport from config.
    pub fn new(config: &Config, token: AuthToken) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.http_timeout)
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            token,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Endpoints ───────────────────────────────────────────────

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.send_json(Method::POST, paths::LOGIN, Some(request)).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        self.send_json(Method::POST, paths::REGISTER, Some(request))
            .await
    }

    pub async fn current_user(&self) -> Result<User, AppError> {
        self.send_json::<(), _>(Method::GET, paths::CURRENT_USER, None)
            .await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AppError> {
        self.send_json(Method::PUT, paths::CURRENT_USER, Some(update))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        self.send_json::<(), _>(Method::GET, paths::CATEGORIES, None)
            .await
    }

    // ─── Transport ───────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one logical request: inject the token, retry non-2xx responses,
    /// and return the final response whatever its status.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = self.url(path);
        let mut retries = 0;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if let Some(token) = self.token.get() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() || !self.retry.should_retry(retries) {
                return Ok(response);
            }

            retries += 1;
            let delay = self.retry.delay_for(retries);
            tracing::debug!(
                %method,
                path,
                status = status.as_u16(),
                retry = retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying request"
            );
            drop(response);
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let response = self.execute(method, path, body).await?;
        check_response_json(response).await
    }

    /// Status code of a GET on the probe endpoint; the body is not read.
    pub async fn probe_status(&self) -> ProbeOutcome {
        match self.execute::<()>(Method::GET, paths::CATEGORIES, None).await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(probe_failure(&e)),
        }
    }
}

#[async_trait]
impl Probe for ApiClient {
    async fn probe(&self) -> ProbeOutcome {
        self.probe_status().await
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }

        return Err(AppError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// Prefer the server's `{"error": ...}` text, then the raw body, then the
/// canonical reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

/// Bucket a transport error into a probe failure.
pub(crate) fn probe_failure(err: &reqwest::Error) -> ProbeFailure {
    if err.is_timeout() {
        return ProbeFailure::Timeout;
    }
    if is_name_resolution(err) {
        return ProbeFailure::NameResolution;
    }
    if err.is_connect() {
        return ProbeFailure::Connect;
    }
    ProbeFailure::Other(err.to_string())
}

/// reqwest does not expose DNS failures as a kind; look through the chain.
fn is_name_resolution(err: &reqwest::Error) -> bool {
    let mut source: Option<&dyn std::error::Error> = Some(err);
    while let Some(e) = source {
        let text = e.to_string().to_ascii_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return true;
        }
        source = e.source();
    }
    false
}
