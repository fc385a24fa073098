use async_trait::async_trait;
use healthwatch::configuration::Settings;
use healthwatch::health::{Dependency, HealthChecker, Probe, ProbeResult, TracingEventSink};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Stands in for a real dependency: waits `delay`, then reports `result`.
pub struct SimulatedProbe {
    result: ProbeResult,
    delay: Duration,
}

impl SimulatedProbe {
    pub fn new(result: ProbeResult) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(result: ProbeResult, delay: Duration) -> Self {
        Self { result, delay }
    }
}

#[async_trait]
impl Probe for SimulatedProbe {
    async fn probe(&self, _descriptor: &str, _timeout: Duration) -> ProbeResult {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

pub fn simulated(name: &str, probe: SimulatedProbe) -> Dependency {
    Dependency::new(
        name,
        "simulated://",
        Duration::from_secs(1),
        Arc::new(probe),
    )
}

fn bind() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    (listener, format!("http://127.0.0.1:{}", port))
}

pub async fn spawn_app_with_dependencies(dependencies: Vec<Dependency>) -> TestApp {
    let (listener, address) = bind();
    let checker = HealthChecker::new(dependencies, Arc::new(TracingEventSink))
        .expect("Dependency names must be unique.");

    let server = healthwatch::startup::run_with_checker(listener, Settings::default(), checker)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}

pub async fn spawn_app(settings: Settings) -> TestApp {
    let (listener, address) = bind();

    let server = healthwatch::startup::run(listener, settings)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}
