// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rehab-Client headless runner
//!
//! Opens the persisted session, runs the startup reachability gate and then
//! logs connectivity status until interrupted.

use rehab_client::{config::Config, session::FileBackend, RehabClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        session = %config.session_path.display(),
        "Starting Rehab-Client"
    );

    let backend = Arc::new(FileBackend::new(config.session_path.clone()));
    let client = RehabClient::connect(config, backend).await?;

    let outcome = client.start().await?;
    tracing::info!(
        ?outcome,
        logged_in = client.store.is_logged_in(),
        "Startup gate complete"
    );

    let mut status = client.connectivity();
    let mut logged_in = client.logged_in();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, shutting down");
                break;
            }
            state = status.recv() => match state {
                Some(state) => tracing::info!(state = %state, "Connectivity status"),
                None => break,
            },
            changed = logged_in.changed() => {
                if changed.is_err() {
                    break;
                }
                tracing::info!(logged_in = *logged_in.borrow_and_update(), "Session changed");
            }
        }
    }

    client.shutdown().await;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rehab_client=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
