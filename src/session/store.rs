// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide session store.
//!
//! Handles:
//! - Serialized writes of the token and cached identity
//! - Live "current token" and "logged in" signals (replay-latest)
//! - Token-only and full session clearing

use super::{CachedIdentity, SessionBackend, SessionRecord, StorageError};
use crate::models::UserIdentity;
use crate::time_utils::format_utc_rfc3339;
use futures_util::Stream;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;

/// Source of truth for "is a user logged in".
///
/// All writes go through one async mutex, so they are linearized with
/// respect to each other and to snapshot reads. Live signals are updated
/// only after the backend accepted the new record.
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    record: Mutex<SessionRecord>,
    token_tx: watch::Sender<Option<String>>,
    logged_in_tx: watch::Sender<bool>,
}

impl SessionStore {
    /// Load the persisted record and seed the live signals from it.
    pub async fn open(backend: Arc<dyn SessionBackend>) -> Result<Self, StorageError> {
        let record = backend.load().await?;
        let token = record.auth_token.clone();
        let logged_in = token.is_some();

        tracing::debug!(logged_in, "Session store opened");

        Ok(Self {
            backend,
            record: Mutex::new(record),
            token_tx: watch::channel(token).0,
            logged_in_tx: watch::channel(logged_in).0,
        })
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Persist the bearer token.
    pub async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.update("save_token", |record| {
            record.auth_token = Some(token.to_string());
        })
        .await?;
        tracing::info!("Auth token saved");
        Ok(())
    }

    /// Persist all four identity fields as one unit.
    pub async fn save_identity(&self, identity: &UserIdentity) -> Result<(), StorageError> {
        self.update("save_identity", |record| record.set_identity(identity))
            .await?;
        tracing::info!(user_id = identity.id, role = %identity.role, "User identity saved");
        Ok(())
    }

    /// Persist token and identity in a single write (login/registration).
    pub async fn save_session(
        &self,
        token: &str,
        identity: &UserIdentity,
    ) -> Result<(), StorageError> {
        self.update("save_session", |record| {
            record.auth_token = Some(token.to_string());
            record.set_identity(identity);
        })
        .await?;
        tracing::info!(user_id = identity.id, "Session saved");
        Ok(())
    }

    /// Remove the token only; cached identity stays readable.
    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.update("clear_token", |record| record.auth_token = None)
            .await?;
        tracing::info!("Auth token cleared");
        Ok(())
    }

    /// Remove token and identity.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.update("clear_all", |record| {
            record.auth_token = None;
            record.clear_identity();
        })
        .await?;
        tracing::info!("Session cleared");
        Ok(())
    }

    async fn update<F>(&self, op: &'static str, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut current = self.record.lock().await;

        let mut next = current.clone();
        apply(&mut next);
        next.updated_at = Some(format_utc_rfc3339(chrono::Utc::now()));

        if let Err(e) = self.backend.store(&next).await {
            tracing::error!(op, error = %e, "Session write failed");
            return Err(e);
        }

        *current = next;
        self.publish(&current);
        Ok(())
    }

    /// Push the record's token state to subscribers, only if it changed.
    fn publish(&self, record: &SessionRecord) {
        self.token_tx.send_if_modified(|token| {
            if *token != record.auth_token {
                *token = record.auth_token.clone();
                true
            } else {
                false
            }
        });

        let logged_in = record.auth_token.is_some();
        self.logged_in_tx.send_if_modified(|current| {
            if *current != logged_in {
                *current = logged_in;
                true
            } else {
                false
            }
        });
    }

    // ─── Observation ─────────────────────────────────────────────

    /// Live token signal. The receiver starts at the current value.
    pub fn subscribe_token(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Current token first, then every change.
    pub fn token_stream(&self) -> impl Stream<Item = Option<String>> + Send + 'static {
        WatchStream::new(self.subscribe_token())
    }

    /// Live "logged in" signal (token present).
    pub fn subscribe_logged_in(&self) -> watch::Receiver<bool> {
        self.logged_in_tx.subscribe()
    }

    pub fn logged_in_stream(&self) -> impl Stream<Item = bool> + Send + 'static {
        WatchStream::new(self.subscribe_logged_in())
    }

    // ─── Snapshots ───────────────────────────────────────────────

    pub fn current_token(&self) -> Option<String> {
        self.token_tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        *self.logged_in_tx.borrow()
    }

    /// Cached identity as of the latest completed write.
    pub async fn identity(&self) -> CachedIdentity {
        self.record.lock().await.identity()
    }

    /// Full record as of the latest completed write.
    pub async fn record(&self) -> SessionRecord {
        self.record.lock().await.clone()
    }
}
