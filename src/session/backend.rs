// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage backends for the session record.
//!
//! Backends only promise whole-record atomicity: a `store` either replaces
//! the full record or leaves the previous one untouched.

use super::{SessionRecord, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Read the persisted record. A missing record is an empty one.
    async fn load(&self) -> Result<SessionRecord, StorageError>;

    /// Replace the persisted record.
    async fn store(&self, record: &SessionRecord) -> Result<(), StorageError>;
}

/// JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SessionBackend for FileBackend {
    async fn load(&self) -> Result<SessionRecord, StorageError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionRecord::default())
            }
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_slice(&data).map_err(|err| StorageError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    async fn store(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        // Write aside, then rename over the live file.
        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(&data).await.map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(file);

        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// In-memory backend for tests and offline use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    record: Mutex<SessionRecord>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that starts with an already-persisted record.
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(record),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail (simulates storage I/O failure).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// What is currently "on disk".
    pub fn persisted(&self) -> SessionRecord {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    async fn load(&self) -> Result<SessionRecord, StorageError> {
        Ok(self.persisted())
    }

    async fn store(&self, record: &SessionRecord) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = record.clone();
        Ok(())
    }
}
