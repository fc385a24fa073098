use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-dependency results keyed by dependency name.
pub type Checks = BTreeMap<String, ProbeResult>;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of a single dependency probe.
///
/// The only constructors are [`ProbeResult::healthy`] and
/// [`ProbeResult::unhealthy`], so `error` is present exactly when the
/// status is `Unhealthy`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeResult {
    status: ProbeStatus,
    duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProbeResult {
    pub fn healthy(duration_ms: f64) -> Self {
        Self {
            status: ProbeStatus::Healthy,
            duration_ms: duration_ms.max(0.0),
            error: None,
        }
    }

    pub fn unhealthy(duration_ms: f64, error: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unhealthy,
            duration_ms: duration_ms.max(0.0),
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ProbeStatus::Healthy
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    NotReady,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    Alive,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub checks: Checks,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub status: Readiness,
    pub timestamp: DateTime<Utc>,
    pub checks: Checks,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.status == Readiness::Ready
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LivenessReport {
    pub status: Liveness,
    pub timestamp: DateTime<Utc>,
}
