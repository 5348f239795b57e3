// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend reachability supervision.

pub mod probe;
pub mod state;
pub mod supervisor;

pub use probe::Probe;
pub use state::{classify, ConnectivityState, ProbeFailure, ProbeOutcome};
pub use supervisor::{ConnectivitySupervisor, MonitorHandle, StatusSubscription};
