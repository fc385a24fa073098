use std::time::Duration;

/// Ways a dependency probe can fail. None of these escape a probe: they are
/// folded into an unhealthy [`ProbeResult`](super::ProbeResult).
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{service} connection failed: {reason}")]
    Connection { service: &'static str, reason: String },

    #[error("{service} connection timeout after {:?}s", .timeout.as_secs_f64())]
    Timeout {
        service: &'static str,
        timeout: Duration,
    },

    #[error("{service} verification failed: {reason}")]
    Verification { service: &'static str, reason: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Rejected dependency sets.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("dependency {0:?} is configured more than once")]
    DuplicateDependency(String),
}

impl ProbeError {
    pub fn connection(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Connection {
            service,
            reason: err.to_string(),
        }
    }

    pub fn verification(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Verification {
            service,
            reason: err.to_string(),
        }
    }
}
