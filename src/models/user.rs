// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for the API and the cached session identity.

use serde::{Deserialize, Serialize};

/// User profile as returned by the platform API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    /// "patient", "expert", ...
    pub role: String,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub medical_record_no: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Clinical staff member this patient messages
    #[serde(default)]
    pub assigned_expert_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// The subset of the profile cached alongside the session token.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// Identity fields persisted with the session.
///
/// Advisory only: authorization is always enforced server-side via the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Partial profile update.
///
/// `None` means "leave unchanged"; the field is not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.hospital.is_none()
            && self.phone_number.is_none()
    }
}
