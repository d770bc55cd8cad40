// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands. Each returns the text to print.

use plantwatch_core::{MetricKind, PlantwatchError};
use plantwatch_telemetry::TelemetryService;
use serde::Serialize;
use tracing::warn;

pub async fn devices(service: &TelemetryService) -> Result<String, PlantwatchError> {
    to_json(&service.device_list().await)
}

pub async fn latest(service: &TelemetryService, device_id: &str) -> Result<String, PlantwatchError> {
    let entry = service.latest(device_id).await;
    if entry.is_none() {
        warn!(device_id, "no latest entry available");
    }
    to_json(&entry)
}

pub async fn history(
    service: &TelemetryService,
    device_id: &str,
    limit: usize,
) -> Result<String, PlantwatchError> {
    let mut samples = service.historical(device_id).await;
    samples.truncate(limit);
    to_json(&samples)
}

pub async fn realtime(
    service: &TelemetryService,
    device_id: &str,
) -> Result<String, PlantwatchError> {
    to_json(&service.realtime(device_id).await)
}

pub async fn threshold_get(
    service: &TelemetryService,
    device_id: &str,
    metric: MetricKind,
) -> Result<String, PlantwatchError> {
    Ok(match service.get_threshold(device_id, metric).await {
        Some(value) => format!("{metric}: {value}"),
        None => format!("{metric}: unset"),
    })
}

pub async fn threshold_set(
    service: &TelemetryService,
    device_id: &str,
    metric: MetricKind,
    value: f64,
) -> Result<(), PlantwatchError> {
    if service.set_threshold(device_id, metric, value).await {
        Ok(())
    } else {
        Err(PlantwatchError::Internal(format!(
            "backend rejected {metric} threshold for {device_id}"
        )))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, PlantwatchError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PlantwatchError::Internal(format!("failed to render output: {e}")))
}
