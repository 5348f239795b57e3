// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP transport and platform API client.

pub mod client;
pub mod retry;
pub mod token;

pub use client::ApiClient;
pub use retry::RetryPolicy;
pub use token::AuthToken;
