// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token source injected into the HTTP transport.

use crate::session::SessionStore;
use tokio::sync::watch;

/// Read-only view of the current bearer token.
///
/// The session store is the only writer; the transport reads the latest
/// value on every request, so a completed login or logout is visible to the
/// very next request.
#[derive(Clone)]
pub struct AuthToken {
    source: watch::Receiver<Option<String>>,
}

impl AuthToken {
    /// Follow the token held by `store`.
    pub fn from_store(store: &SessionStore) -> Self {
        Self {
            source: store.subscribe_token(),
        }
    }

    /// A token that never changes (tests, anonymous tooling).
    pub fn fixed(token: Option<String>) -> Self {
        let (_tx, source) = watch::channel(token);
        Self { source }
    }

    pub fn anonymous() -> Self {
        Self::fixed(None)
    }

    pub fn get(&self) -> Option<String> {
        self.source.borrow().clone()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("present", &self.source.borrow().is_some())
            .finish()
    }
}
