// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The reachability probe seam.

use super::ProbeOutcome;
use async_trait::async_trait;
use std::sync::Arc;

/// One cheap request against the backend, reduced to its status code.
///
/// Implementations must never panic or return early on network faults;
/// every fault is reported as a `ProbeFailure`.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> ProbeOutcome;
}

#[async_trait]
impl<P: Probe + ?Sized> Probe for Arc<P> {
    async fn probe(&self) -> ProbeOutcome {
        (**self).probe().await
    }
}
