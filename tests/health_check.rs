mod common;

use common::{simulated, spawn_app, spawn_app_with_dependencies, SimulatedProbe};
use healthwatch::configuration::Settings;
use healthwatch::health::ProbeResult;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

#[tokio::test]
async fn health_without_dependencies_is_healthy() {
    let app = spawn_app_with_dependencies(vec![]).await;

    let response = app.get("/health").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"], json!({}));
    assert!(body["timestamp"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_endpoint() {
    let app = spawn_app_with_dependencies(vec![]).await;

    let response = app.get("/health/").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn healthy_database_is_reported() {
    let app = spawn_app_with_dependencies(vec![simulated(
        "database",
        SimulatedProbe::new(ProbeResult::healthy(50.0)),
    )])
    .await;

    let response = app.get("/health").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(
        body["checks"],
        json!({"database": {"status": "healthy", "duration_ms": 50.0}})
    );
}

#[tokio::test]
async fn unhealthy_database_fails_health_and_readiness() {
    let app = spawn_app_with_dependencies(vec![simulated(
        "database",
        SimulatedProbe::new(ProbeResult::unhealthy(100.0, "Connection refused")),
    )])
    .await;

    let response = app.get("/health").await;
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["database"]["status"], "unhealthy");
    assert_eq!(body["checks"]["database"]["error"], "Connection refused");

    let response = app.get("/health/ready").await;
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["checks"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn unhealthy_cache_fails_health_but_not_readiness() {
    let app = spawn_app_with_dependencies(vec![simulated(
        "redis",
        SimulatedProbe::new(ProbeResult::unhealthy(3.0, "Connection refused")),
    )])
    .await;

    let response = app.get("/health").await;
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");

    let response = app.get("/health/ready").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["redis"]["status"], "unhealthy");
}

#[tokio::test]
async fn liveness_ignores_dependency_state() {
    let app = spawn_app_with_dependencies(vec![simulated(
        "database",
        SimulatedProbe::new(ProbeResult::unhealthy(1.0, "Connection refused")),
    )])
    .await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "alive");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn slow_probes_are_awaited_concurrently() {
    let delay = Duration::from_millis(300);
    let app = spawn_app_with_dependencies(vec![
        simulated(
            "database",
            SimulatedProbe::delayed(ProbeResult::healthy(300.0), delay),
        ),
        simulated(
            "redis",
            SimulatedProbe::delayed(ProbeResult::healthy(300.0), delay),
        ),
        simulated(
            "search",
            SimulatedProbe::delayed(ProbeResult::healthy(300.0), delay),
        ),
    ])
    .await;

    let start = Instant::now();
    let response = app.get("/health").await;
    let elapsed = start.elapsed();

    assert_eq!(response.status().as_u16(), 200);
    assert!(elapsed < Duration::from_millis(800), "took {:?}", elapsed);
}

#[tokio::test]
async fn responses_carry_timing_header() {
    let app = spawn_app_with_dependencies(vec![]).await;

    let response = app.get("/health/live").await;

    let header = response
        .headers()
        .get("x-response-time")
        .expect("missing X-Response-Time")
        .to_str()
        .unwrap();
    assert!(header.ends_with("ms"));
}

#[tokio::test]
async fn metrics_accumulate_probe_outcomes() {
    let app = spawn_app_with_dependencies(vec![simulated(
        "database",
        SimulatedProbe::new(ProbeResult::healthy(10.0)),
    )])
    .await;

    app.get("/health").await;
    app.get("/health/ready").await;

    let response = app.get("/health/metrics").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["database"]["total_checks"], 2);
    assert_eq!(body["database"]["healthy_count"], 2);
    assert_eq!(body["database"]["uptime_percentage"], "100.00");
}

#[tokio::test]
async fn index_describes_the_service() {
    let app = spawn_app_with_dependencies(vec![]).await;

    let response = app.get("/").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["readiness"], "/health/ready");
}

#[tokio::test]
async fn configured_but_unreachable_cache_is_probed_for_real() {
    let refused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = refused.local_addr().unwrap().port();
    drop(refused);

    let app = spawn_app(Settings {
        redis_url: Some(format!("redis://127.0.0.1:{}/", port)),
        health_check_timeout: 2.0,
        ..Settings::default()
    })
    .await;

    let response = app.get("/health").await;
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    let checks = body["checks"].as_object().unwrap();
    assert_eq!(checks.len(), 1);
    assert!(body["checks"]["redis"]["error"]
        .as_str()
        .unwrap()
        .starts_with("Redis connection"));

    let response = app.get("/health/ready").await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn invalid_timeout_refuses_to_start() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

    let result = healthwatch::startup::run(
        listener,
        Settings {
            health_check_timeout: 0.0,
            ..Settings::default()
        },
    )
    .await;

    assert!(result.is_err());
}
