// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session policy and auth flows.

pub mod auth;
pub mod session_gate;

pub use auth::AuthService;
pub use session_gate::{startup_gate, DisconnectResolution, GateOutcome};
