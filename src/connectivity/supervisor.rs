// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic backend reachability supervision.
//!
//! One background task probes, classifies, publishes, then sleeps for the
//! configured interval. Iterations never overlap, so at most one probe is in
//! flight. Every probe result is published, including repeats of the same
//! state, to any number of subscribers.

use super::{classify, ConnectivityState, Probe};
use futures_util::Stream;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Buffered emissions per subscriber before it starts skipping ahead.
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Latest state plus the fan-out channel, updated under one lock so a new
/// subscriber sees each emission exactly once (as replay or as event).
struct StatusFeed {
    latest: Mutex<ConnectivityState>,
    tx: broadcast::Sender<ConnectivityState>,
}

impl StatusFeed {
    fn new() -> Self {
        Self {
            latest: Mutex::new(ConnectivityState::Checking),
            tx: broadcast::channel(STATUS_CHANNEL_CAPACITY).0,
        }
    }

    fn publish(&self, state: ConnectivityState) {
        let mut latest = self.latest.lock().unwrap_or_else(|p| p.into_inner());

        match (&*latest, &state) {
            (ConnectivityState::Connected, ConnectivityState::Connected) => {}
            (_, ConnectivityState::Connected) => tracing::info!("Backend reachable"),
            (_, ConnectivityState::Disconnected { reason }) if !latest.is_disconnected() => {
                tracing::warn!(reason = %reason, "Backend unreachable")
            }
            _ => {}
        }
        tracing::debug!(state = %state, "Connectivity probe classified");

        *latest = state.clone();
        // No receivers is fine; the latest value is still kept for replay.
        let _ = self.tx.send(state);
    }

    fn current(&self) -> ConnectivityState {
        self.latest.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn subscribe(&self) -> StatusSubscription {
        let latest = self.latest.lock().unwrap_or_else(|p| p.into_inner());
        StatusSubscription {
            initial: Some(latest.clone()),
            rx: self.tx.subscribe(),
        }
    }
}

/// Classifies backend reachability on a fixed interval.
pub struct ConnectivitySupervisor {
    probe: Arc<dyn Probe>,
    interval: Duration,
    feed: Arc<StatusFeed>,
}

impl ConnectivitySupervisor {
    pub fn new(probe: Arc<dyn Probe>, interval: Duration) -> Self {
        Self {
            probe,
            interval,
            feed: Arc::new(StatusFeed::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Latest published state (`Checking` until the first probe completes).
    pub fn current(&self) -> ConnectivityState {
        self.feed.current()
    }

    /// Live status: the latest state first, then every later emission.
    pub fn subscribe(&self) -> StatusSubscription {
        self.feed.subscribe()
    }

    /// Single probe, no retry, result not published.
    ///
    /// Uses the same rule as the live loop: 2xx or 401 is reachable.
    pub async fn check_once(&self) -> bool {
        let outcome = self.probe.probe().await;
        let state = classify(&outcome);
        tracing::debug!(state = %state, "One-shot connectivity check");
        state.is_connected()
    }

    /// Spawn the probe loop. It runs until the handle is stopped or dropped.
    pub fn start_monitoring(&self) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let probe = self.probe.clone();
        let feed = self.feed.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            tracing::info!(
                interval_secs = interval.as_secs_f64(),
                "Connectivity monitoring started"
            );

            loop {
                let cycle = async {
                    let outcome = probe.probe().await;
                    feed.publish(classify(&outcome));
                    tokio::time::sleep(interval).await;
                };

                tokio::select! {
                    // Err means the handle is gone; stop either way.
                    _ = shutdown_rx.changed() => break,
                    _ = cycle => {}
                }
            }

            tracing::info!("Connectivity monitoring stopped");
        });

        MonitorHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owner of a running probe loop. Dropping it aborts the loop.
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it to exit.
    ///
    /// An in-flight probe or interval sleep is cancelled.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Connectivity monitor task failed");
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Receiver side of the connectivity status.
pub struct StatusSubscription {
    initial: Option<ConnectivityState>,
    rx: broadcast::Receiver<ConnectivityState>,
}

impl StatusSubscription {
    /// Next state; `None` once the supervisor is gone.
    pub async fn recv(&mut self) -> Option<ConnectivityState> {
        if let Some(state) = self.initial.take() {
            return Some(state);
        }

        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Connectivity subscriber lagged, skipping ahead");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next state if one is already queued.
    pub fn try_recv(&mut self) -> Option<ConnectivityState> {
        if let Some(state) = self.initial.take() {
            return Some(state);
        }

        loop {
            match self.rx.try_recv() {
                Ok(state) => return Some(state),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Connectivity subscriber lagged, skipping ahead");
                }
                Err(_) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = ConnectivityState> + Send + 'static {
        futures_util::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|state| (state, sub))
        })
    }
}
