// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session layer: bearer token plus cached identity.

pub mod backend;
pub mod record;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, SessionBackend};
pub use record::{CachedIdentity, SessionRecord};
pub use store::SessionStore;

use std::path::PathBuf;

/// Field names of the persisted record.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_ID: &str = "user_id";
    pub const USER_NAME: &str = "user_name";
    pub const USER_EMAIL: &str = "user_email";
    pub const USER_ROLE: &str = "user_role";
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Session record at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Session backend unavailable: {0}")]
    Unavailable(String),
}
