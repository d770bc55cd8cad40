// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plantwatch watch`: live polling with signal-driven shutdown.

use std::sync::Arc;

use plantwatch_config::model::PollingConfig;
use plantwatch_core::{DataKind, DeviceId, TelemetrySource};
use plantwatch_telemetry::{DashboardState, DeviceMonitor, PollIntervals};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Returns a token that is cancelled on SIGINT (Ctrl+C) or SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), stopping"),
                        _ = sigterm.recv() => info!("received SIGTERM, stopping"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), stopping");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, stopping");
        }

        token_clone.cancel();
        debug!("signal handler completed");
    });

    token
}

/// Polls `device_id` until `shutdown` fires, logging every applied update.
/// Returns the final dashboard state.
pub async fn run_watch(
    source: Arc<dyn TelemetrySource>,
    polling: &PollingConfig,
    device_id: DeviceId,
    shutdown: CancellationToken,
) -> DashboardState {
    let (tx, mut rx) = mpsc::channel(32);
    let mut monitor = DeviceMonitor::new(source, PollIntervals::from_config(polling), tx);
    let mut dashboard = DashboardState::from_config(polling);

    let epoch = monitor.select_device(device_id.clone());
    dashboard.select(Some(device_id), epoch);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            update = rx.recv() => {
                let Some(update) = update else { break };
                let kind = update.payload.kind();
                if dashboard.apply(update) {
                    report(&dashboard, kind);
                }
            }
        }
    }

    monitor.shutdown().await;
    dashboard
}

fn report(dashboard: &DashboardState, kind: DataKind) {
    let device_id = dashboard
        .device_id()
        .map(DeviceId::as_str)
        .unwrap_or_default();
    match kind {
        DataKind::Latest => {
            let tiles = dashboard
                .tiles()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            info!(device_id, "{tiles}");
        }
        DataKind::Realtime => {
            info!(device_id, samples = dashboard.realtime().len(), "realtime window updated");
        }
        DataKind::Historical | DataKind::DeviceList => {
            info!(device_id, samples = dashboard.historical().len(), "history updated");
        }
    }
}
