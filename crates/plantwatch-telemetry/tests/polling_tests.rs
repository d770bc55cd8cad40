// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end polling: backend -> service -> monitor -> dashboard.

use std::sync::Arc;
use std::time::Duration;

use plantwatch_core::{DataKind, DeviceId, TelemetrySource};
use plantwatch_telemetry::{DashboardState, DeviceMonitor, PollIntervals, TelemetryService};
use plantwatch_test_utils::TestBackend;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn fast_intervals() -> PollIntervals {
    PollIntervals {
        latest: Duration::from_millis(30),
        realtime: Duration::from_millis(50),
        historical: Duration::from_millis(150),
    }
}

async fn mount_device(backend: &TestBackend, device: &str, temperature: f64) {
    let history: Vec<_> = (0..30)
        .map(|i| json!({ "temperature": temperature, "humidity": i }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/api/telemetry/{device}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(history)))
        .mount(backend.server())
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/telemetry/realtime/{device}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "temperature": temperature }])),
        )
        .mount(backend.server())
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/telemetry/latest/{device}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deviceId": device,
            "temperature": temperature,
            "humidity": 55,
            "oilLevel": { "value": 80 },
            "openAlerts": 1
        })))
        .mount(backend.server())
        .await;
}

#[tokio::test]
async fn dashboard_follows_selected_device() {
    let backend = TestBackend::start().await;
    mount_device(&backend, "dev-1", 20.0).await;
    mount_device(&backend, "dev-2", 35.0).await;

    let service: Arc<dyn TelemetrySource> =
        Arc::new(TelemetryService::from_config(&backend.config()).unwrap());
    let (tx, mut rx) = mpsc::channel(64);
    let mut monitor = DeviceMonitor::new(Arc::clone(&service), fast_intervals(), tx);
    let mut dashboard = DashboardState::default();

    let epoch = monitor.select_device(DeviceId::from("dev-1"));
    dashboard.select(Some(DeviceId::from("dev-1")), epoch);

    let _ = tokio::time::timeout(Duration::from_millis(300), async {
        while let Some(update) = rx.recv().await {
            dashboard.apply(update);
        }
    })
    .await;

    assert_eq!(dashboard.latest().map(|e| e.temperature), Some(20.0));
    assert_eq!(dashboard.historical().len(), 20);
    assert_eq!(dashboard.realtime().len(), 1);
    assert_eq!(dashboard.tiles()[3].value, 80.0);

    let epoch = monitor.select_device(DeviceId::from("dev-2"));
    dashboard.select(Some(DeviceId::from("dev-2")), epoch);

    // Updates still queued for dev-1 are dropped by the epoch check.
    let _ = tokio::time::timeout(Duration::from_millis(300), async {
        while let Some(update) = rx.recv().await {
            dashboard.apply(update);
        }
    })
    .await;

    assert_eq!(dashboard.latest().map(|e| e.temperature), Some(35.0));
    assert!(
        dashboard
            .historical()
            .iter()
            .all(|s| s.temperature == 35.0)
    );
    assert_eq!(dashboard.device_id(), Some(&DeviceId::from("dev-2")));

    monitor.shutdown().await;
    assert_eq!(monitor.active_tasks(), 0);
}

#[tokio::test]
async fn plant_switch_empties_the_cache() {
    let backend = TestBackend::start().await;
    mount_device(&backend, "dev-1", 20.0).await;
    backend
        .mount_get("/telemetry/devices", 200, json!(["dev-1"]), 2)
        .await;

    let service = Arc::new(TelemetryService::from_config(&backend.config()).unwrap());
    let (tx, mut rx) = mpsc::channel(64);
    let source: Arc<dyn TelemetrySource> = service.clone();
    let mut monitor = DeviceMonitor::new(source, fast_intervals(), tx);

    service.device_list().await;
    monitor.select_device(DeviceId::from("dev-1"));
    for _ in 0..3 {
        rx.recv().await.unwrap();
    }

    monitor.select_plant();
    monitor.shutdown().await;

    assert!(
        service
            .cached_at(DataKind::DeviceList, "")
            .is_none()
    );
    // The list is fetched again after the plant switch.
    service.device_list().await;
}
