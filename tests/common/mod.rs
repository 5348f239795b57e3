// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use rehab_client::api::{ApiClient, AuthToken};
use rehab_client::config::Config;
use rehab_client::connectivity::{Probe, ProbeOutcome};
use rehab_client::models::UserIdentity;
use rehab_client::session::{MemoryBackend, SessionStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Probe that replays a fixed script, then hangs forever.
#[allow(dead_code)]
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeOutcome>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = ProbeOutcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}

/// Serve `router` on an ephemeral local port; returns the API base URL.
#[allow(dead_code)]
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/", addr)
}

/// A local URL nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/", addr)
}

#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config::test_default().with_base_url(base_url)
}

#[allow(dead_code)]
pub async fn memory_store() -> (Arc<SessionStore>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let store = SessionStore::open(backend.clone())
        .await
        .expect("Memory store should open");
    (Arc::new(store), backend)
}

#[allow(dead_code)]
pub fn api_for(base_url: &str, store: &SessionStore) -> ApiClient {
    ApiClient::new(&test_config(base_url), AuthToken::from_store(store)).unwrap()
}

#[allow(dead_code)]
pub fn jane() -> UserIdentity {
    UserIdentity {
        id: 7,
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        role: "patient".to_string(),
    }
}

#[allow(dead_code)]
pub fn jane_json() -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "email": "jane@x.com",
        "name": "Jane Doe",
        "role": "patient",
        "assignedExpertId": 3
    })
}
