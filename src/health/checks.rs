use super::error::{CheckerError, ProbeError};
use super::events::{HealthEvent, HealthEventSink};
use super::models::{Checks, HealthReport, LivenessReport, ProbeResult, ReadinessReport};
use super::policy::{classify_health, classify_liveness, classify_readiness, CRITICAL_DEPENDENCIES};
use super::probes::{PostgresProbe, Probe, RedisProbe};
use crate::configuration::HealthCheckSettings;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::Instrument;

/// A configured dependency: what to probe, where, and for how long.
#[derive(Clone)]
pub struct Dependency {
    name: String,
    descriptor: String,
    timeout: Duration,
    probe: Arc<dyn Probe>,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        descriptor: impl Into<String>,
        timeout: Duration,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            timeout,
            probe,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Dependency {
    // descriptor holds credentials
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Probes every configured dependency concurrently and classifies the outcome.
///
/// Dependency names are unique. Every call probes afresh; nothing is cached
/// between requests.
pub struct HealthChecker {
    dependencies: Vec<Dependency>,
    sink: Arc<dyn HealthEventSink>,
}

impl HealthChecker {
    pub fn new(
        dependencies: Vec<Dependency>,
        sink: Arc<dyn HealthEventSink>,
    ) -> Result<Self, CheckerError> {
        let mut seen = BTreeSet::new();
        for dependency in &dependencies {
            if !seen.insert(dependency.name.as_str()) {
                return Err(CheckerError::DuplicateDependency(dependency.name.clone()));
            }
        }

        Ok(Self { dependencies, sink })
    }

    /// Builds the checker from settings. Dependencies without a connection
    /// string are left out entirely.
    pub fn from_settings(settings: &HealthCheckSettings, sink: Arc<dyn HealthEventSink>) -> Self {
        let mut dependencies = Vec::new();

        if let Some(url) = settings.database.url.as_deref() {
            dependencies.push(Dependency::new(
                "database",
                url,
                settings.database.timeout,
                Arc::new(PostgresProbe),
            ));
        }
        if let Some(url) = settings.redis.url.as_deref() {
            dependencies.push(Dependency::new(
                "redis",
                url,
                settings.redis.timeout,
                Arc::new(RedisProbe),
            ));
        }

        // "database" and "redis" cannot collide
        Self { dependencies, sink }
    }

    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.iter().map(Dependency::name).collect()
    }

    /// Runs one probe task per dependency and waits for all of them.
    ///
    /// A task that dies without producing a result still gets an unhealthy
    /// entry, so the map always holds exactly one entry per dependency.
    #[tracing::instrument(name = "Run dependency checks.", skip(self))]
    pub async fn run_checks(&self) -> Checks {
        let launched = Instant::now();

        let tasks: Vec<_> = self
            .dependencies
            .iter()
            .map(|dependency| {
                let probe = dependency.probe.clone();
                let descriptor = dependency.descriptor.clone();
                let timeout = dependency.timeout;
                tokio::spawn(
                    async move { probe.probe(&descriptor, timeout).await }.in_current_span(),
                )
            })
            .collect();

        let joined = futures::future::join_all(tasks).await;

        let mut checks = Checks::new();
        for (dependency, outcome) in self.dependencies.iter().zip(joined) {
            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(service = %dependency.name, "Probe task failed: {:?}", err);
                    ProbeResult::unhealthy(
                        elapsed_ms(launched),
                        ProbeError::Unexpected(panic_message(err)).to_string(),
                    )
                }
            };

            self.sink.emit(&HealthEvent::probe(&dependency.name, &result));
            checks.insert(dependency.name.clone(), result);
        }

        checks
    }

    pub async fn health_report(&self) -> HealthReport {
        let timestamp = Utc::now();
        let started = Instant::now();
        let checks = self.run_checks().await;
        let status = classify_health(&checks);

        self.sink.emit(&HealthEvent::summary(
            "health",
            status,
            elapsed_ms(started),
            &checks,
        ));

        HealthReport {
            status,
            timestamp,
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks,
        }
    }

    pub async fn readiness_report(&self) -> ReadinessReport {
        let timestamp = Utc::now();
        let started = Instant::now();
        let checks = self.run_checks().await;
        let status = classify_readiness(&checks, CRITICAL_DEPENDENCIES);

        self.sink.emit(&HealthEvent::summary(
            "readiness",
            status,
            elapsed_ms(started),
            &checks,
        ));

        ReadinessReport {
            status,
            timestamp,
            checks,
        }
    }

    /// Liveness never touches a dependency.
    pub fn liveness_report() -> LivenessReport {
        LivenessReport {
            status: classify_liveness(),
            timestamp: Utc::now(),
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "probe task panicked".to_string()
    }
}
