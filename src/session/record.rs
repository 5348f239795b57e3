// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The flat persisted session record.

use crate::models::UserIdentity;
use serde::{Deserialize, Serialize};

/// Whole session as stored on disk.
///
/// Every field is optional; an empty record means "never logged in".
/// Unset fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    /// Last successful write (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SessionRecord {
    pub fn set_identity(&mut self, identity: &UserIdentity) {
        self.user_id = Some(identity.id.to_string());
        self.user_name = Some(identity.name.clone());
        self.user_email = Some(identity.email.clone());
        self.user_role = Some(identity.role.clone());
    }

    pub fn clear_identity(&mut self) {
        self.user_id = None;
        self.user_name = None;
        self.user_email = None;
        self.user_role = None;
    }

    pub fn identity(&self) -> CachedIdentity {
        CachedIdentity {
            id: self.user_id.clone(),
            name: self.user_name.clone(),
            email: self.user_email.clone(),
            role: self.user_role.clone(),
        }
    }
}

/// Identity fields as read back from the store. May be stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedIdentity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl CachedIdentity {
    /// Stored id as a number; `None` if unset or not numeric.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_deref().and_then(|id| id.parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}
