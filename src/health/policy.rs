use super::models::{Checks, HealthStatus, Liveness, ProbeStatus, Readiness};

/// Dependencies whose failure makes the service not ready.
pub const CRITICAL_DEPENDENCIES: &[&str] = &["database"];

/// Unhealthy as soon as one probe failed. No probes means nothing can be failing.
pub fn classify_health(checks: &Checks) -> HealthStatus {
    if checks
        .values()
        .any(|result| result.status() == ProbeStatus::Unhealthy)
    {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    }
}

/// Not ready iff a dependency named in `critical` is unhealthy.
pub fn classify_readiness(checks: &Checks, critical: &[&str]) -> Readiness {
    let failed = checks.iter().find(|(name, result)| {
        critical.contains(&name.as_str()) && result.status() == ProbeStatus::Unhealthy
    });

    match failed {
        Some((name, result)) => {
            tracing::info!(
                service = %name,
                error = result.error().unwrap_or_default(),
                "Critical dependency is unhealthy"
            );
            Readiness::NotReady
        }
        None => Readiness::Ready,
    }
}

pub fn classify_liveness() -> Liveness {
    Liveness::Alive
}
