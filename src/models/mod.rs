// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the platform API.

pub mod auth;
pub mod catalog;
pub mod user;

pub use auth::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest};
pub use catalog::{Category, CategoryCount};
pub use user::{ProfileUpdate, User, UserIdentity};
