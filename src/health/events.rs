//! Structured health events and the sink they are reported to.

use super::models::{Checks, ProbeResult, ProbeStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthEventKind {
    ProbeCompleted,
    Summary,
}

/// One reportable health event. `metadata` carries anything beyond the fixed fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthEvent {
    pub kind: HealthEventKind,
    pub service: String,
    pub status: String,
    pub duration_ms: f64,
    pub error: Option<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl HealthEvent {
    pub fn probe(service: &str, result: &ProbeResult) -> Self {
        let status = match result.status() {
            ProbeStatus::Healthy => "healthy",
            ProbeStatus::Unhealthy => "unhealthy",
        };

        Self {
            kind: HealthEventKind::ProbeCompleted,
            service: service.to_string(),
            status: status.to_string(),
            duration_ms: result.duration_ms(),
            error: result.error().map(str::to_string),
            metadata: BTreeMap::new(),
        }
    }

    /// Aggregate outcome of one health or readiness evaluation.
    pub fn summary(scope: &str, status: impl Serialize, duration_ms: f64, checks: &Checks) -> Self {
        let failing: Vec<&str> = checks
            .iter()
            .filter(|(_, result)| !result.is_healthy())
            .map(|(name, _)| name.as_str())
            .collect();

        Self {
            kind: HealthEventKind::Summary,
            service: scope.to_string(),
            status: serde_json::to_value(status)
                .ok()
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default(),
            duration_ms,
            error: None,
            metadata: BTreeMap::new(),
        }
        .with_metadata("services_checked", checks.len())
        .with_metadata("failing", failing)
    }

    pub fn with_metadata(mut self, key: &str, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.to_string(), value);
        }
        self
    }
}

/// Destination for health events. Injected into the aggregator at startup.
pub trait HealthEventSink: Send + Sync {
    fn emit(&self, event: &HealthEvent);
}

/// Forwards events to `tracing`; the process-wide subscriber decides the output format.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl HealthEventSink for TracingEventSink {
    fn emit(&self, event: &HealthEvent) {
        let metadata = serde_json::to_string(&event.metadata).unwrap_or_default();

        match (event.kind, event.error.as_deref()) {
            (HealthEventKind::ProbeCompleted, Some(error)) => tracing::warn!(
                service_checked = %event.service,
                check_status = %event.status,
                duration_ms = event.duration_ms,
                error_message = error,
                metadata = %metadata,
                "Health check failed"
            ),
            (HealthEventKind::ProbeCompleted, None) => tracing::info!(
                service_checked = %event.service,
                check_status = %event.status,
                duration_ms = event.duration_ms,
                metadata = %metadata,
                "Health check passed"
            ),
            (HealthEventKind::Summary, _) => tracing::info!(
                scope = %event.service,
                overall_status = %event.status,
                duration_ms = event.duration_ms,
                metadata = %metadata,
                "Health check completed"
            ),
        }
    }
}
