mod checks;
mod error;
mod events;
mod metrics;
mod models;
mod policy;
mod probes;

pub use checks::{Dependency, HealthChecker};
pub use error::{CheckerError, ProbeError};
pub use events::{HealthEvent, HealthEventKind, HealthEventSink, TracingEventSink};
pub use metrics::HealthMetrics;
pub use models::{
    Checks, HealthReport, HealthStatus, Liveness, LivenessReport, ProbeResult, ProbeStatus,
    Readiness, ReadinessReport,
};
pub use policy::{classify_health, classify_liveness, classify_readiness, CRITICAL_DEPENDENCIES};
pub use probes::{bounded, PostgresProbe, Probe, RedisProbe};
