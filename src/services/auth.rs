// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration, logout and profile flows.

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest, User};
use crate::session::SessionStore;
use std::sync::Arc;
use validator::Validate;

/// Ties API auth calls to the session store.
///
/// The session is written only after the backend accepted the credentials,
/// and a failed write is reported rather than treated as logged in.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, store: Arc<SessionStore>) -> Self {
        Self { api, store }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.login(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "Login failed");
            e
        })?;

        self.store
            .save_session(&response.token, &response.user.identity())
            .await?;

        tracing::info!(user_id = response.user.id, "Logged in");
        Ok(response.user)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        request.validate()?;

        let response = self.api.register(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "Registration failed");
            e
        })?;

        self.store
            .save_session(&response.token, &response.user.identity())
            .await?;

        tracing::info!(user_id = response.user.id, "Registered and logged in");
        Ok(response.user)
    }

    /// Token-only logout; the cached identity is kept.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear_token().await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User> {
        self.api.current_user().await
    }

    /// Apply a partial profile update and refresh the cached identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        if update.is_empty() {
            return Err(AppError::Validation("no profile fields to update".to_string()));
        }

        let user = self.api.update_profile(update).await?;
        self.store.save_identity(&user.identity()).await?;
        Ok(user)
    }
}
