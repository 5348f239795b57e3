// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session policy tied to backend reachability.
//!
//! Only the startup check clears the session automatically. Later
//! disconnections are surfaced to the user, who picks a
//! `DisconnectResolution`.

use crate::connectivity::ConnectivitySupervisor;
use crate::session::{SessionStore, StorageError};

/// Result of the one-time startup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Backend answered; the persisted session is kept as is.
    Reachable,
    /// Backend unreachable; the session was cleared.
    Unreachable { had_session: bool },
}

impl GateOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, GateOutcome::Reachable)
    }
}

/// The two ways out of the "server offline" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectResolution {
    /// Clear the whole session and return to login.
    ForceLogout,
    /// Stop the client; the persisted session is left alone.
    Terminate,
}

/// Probe once and clear the session if the backend is unreachable.
///
/// Must complete before any authenticated screen is shown.
pub async fn startup_gate(
    supervisor: &ConnectivitySupervisor,
    store: &SessionStore,
) -> Result<GateOutcome, StorageError> {
    if supervisor.check_once().await {
        tracing::info!("Startup check passed, backend reachable");
        return Ok(GateOutcome::Reachable);
    }

    let had_session = store.is_logged_in();
    tracing::warn!(had_session, "Backend unreachable at startup, clearing session");
    store.clear_all().await?;

    Ok(GateOutcome::Unreachable { had_session })
}
