// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rehab-Client: session and connectivity core for the rehabilitation platform
//!
//! This crate holds the authenticated session of a patient client, talks to
//! the platform REST API, and supervises backend reachability. Screens
//! depend on two signals only: "logged in" and connectivity status.

pub mod api;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod time_utils;

use api::{ApiClient, AuthToken};
use config::Config;
use connectivity::{ConnectivitySupervisor, MonitorHandle, Probe, StatusSubscription};
use error::Result;
use services::{startup_gate, AuthService, DisconnectResolution, GateOutcome};
use session::{SessionBackend, SessionStore};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Wired-up client: session store, API transport, supervisor and auth flows.
pub struct RehabClient {
    pub config: Config,
    pub store: Arc<SessionStore>,
    pub api: ApiClient,
    pub supervisor: ConnectivitySupervisor,
    pub auth: AuthService,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl RehabClient {
    /// Open the session and build the client; the API client is the probe.
    pub async fn connect(config: Config, backend: Arc<dyn SessionBackend>) -> Result<Self> {
        let store = Arc::new(SessionStore::open(backend).await?);
        let api = ApiClient::new(&config, AuthToken::from_store(&store))?;
        let probe: Arc<dyn Probe> = Arc::new(api.clone());
        Ok(Self::assemble(config, store, api, probe))
    }

    /// Build the client around an already-open store and a custom probe.
    pub fn with_probe(
        config: Config,
        store: Arc<SessionStore>,
        probe: Arc<dyn Probe>,
    ) -> Result<Self> {
        let api = ApiClient::new(&config, AuthToken::from_store(&store))?;
        Ok(Self::assemble(config, store, api, probe))
    }

    fn assemble(
        config: Config,
        store: Arc<SessionStore>,
        api: ApiClient,
        probe: Arc<dyn Probe>,
    ) -> Self {
        let supervisor = ConnectivitySupervisor::new(probe, config.probe_interval);
        let auth = AuthService::new(api.clone(), store.clone());
        Self {
            config,
            store,
            api,
            supervisor,
            auth,
            monitor: Mutex::new(None),
        }
    }

    /// Run the startup gate, then start background monitoring.
    pub async fn start(&self) -> Result<GateOutcome> {
        let outcome = startup_gate(&self.supervisor, &self.store).await?;

        let mut monitor = self.monitor.lock().unwrap_or_else(|p| p.into_inner());
        if monitor.is_none() {
            *monitor = Some(self.supervisor.start_monitoring());
        }

        Ok(outcome)
    }

    /// Act on the user's choice in the disconnection prompt.
    pub async fn resolve_disconnect(&self, resolution: DisconnectResolution) -> Result<()> {
        match resolution {
            DisconnectResolution::ForceLogout => {
                tracing::info!("Forced logout after disconnection");
                self.store.clear_all().await?;
            }
            DisconnectResolution::Terminate => {
                tracing::info!("Terminating after disconnection");
                self.shutdown().await;
            }
        }
        Ok(())
    }

    /// Stop background monitoring, if running.
    pub async fn shutdown(&self) {
        let handle = self
            .monitor
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .is_some_and(|h| h.is_running())
    }

    /// UI signal: whether a user is logged in.
    pub fn logged_in(&self) -> watch::Receiver<bool> {
        self.store.subscribe_logged_in()
    }

    /// UI signal: connectivity status.
    pub fn connectivity(&self) -> StatusSubscription {
        self.supervisor.subscribe()
    }
}
