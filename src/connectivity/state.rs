// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reachability states and probe classification.

use std::fmt;

/// Three-state reachability verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityState {
    /// No probe has completed yet.
    Checking,
    Connected,
    Disconnected { reason: String },
}

impl ConnectivityState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectivityState::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectivityState::Disconnected { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ConnectivityState::Disconnected { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityState::Checking => f.write_str("checking"),
            ConnectivityState::Connected => f.write_str("connected"),
            ConnectivityState::Disconnected { reason } => write!(f, "disconnected ({})", reason),
        }
    }
}

/// Why a probe produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Host name could not be resolved.
    NameResolution,
    Timeout,
    /// TCP/TLS connection could not be established.
    Connect,
    Other(String),
}

impl ProbeFailure {
    pub fn reason(&self) -> String {
        match self {
            ProbeFailure::NameResolution => "Server is offline".to_string(),
            ProbeFailure::Timeout => "Connection timeout".to_string(),
            ProbeFailure::Connect => "Cannot reach server".to_string(),
            ProbeFailure::Other(detail) => format!("Connection error: {}", detail),
        }
    }
}

/// HTTP status of the probe response, or why there was none.
pub type ProbeOutcome = Result<u16, ProbeFailure>;

/// 401 proves the server is up and routing; only the credentials were refused.
const UNAUTHORIZED: u16 = 401;

/// Map one probe outcome to a reachability state.
pub fn classify(outcome: &ProbeOutcome) -> ConnectivityState {
    match outcome {
        Ok(status) if is_reachable_status(*status) => ConnectivityState::Connected,
        Ok(status) => ConnectivityState::Disconnected {
            reason: format!("Server error: {}", status),
        },
        Err(failure) => ConnectivityState::Disconnected {
            reason: failure.reason(),
        },
    }
}

fn is_reachable_status(status: u16) -> bool {
    (200..300).contains(&status) || status == UNAUTHORIZED
}
