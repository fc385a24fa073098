//! Dependency probes.
//!
//! A probe opens its own connection, runs a trivial round-trip and closes the
//! connection again, all inside the timeout it was handed. Every failure is
//! reported as an unhealthy [`ProbeResult`]; nothing is returned as an error.

use super::error::ProbeError;
use super::models::ProbeResult;
use async_trait::async_trait;
use sqlx::{Connection, Executor, PgConnection};
use std::future::Future;
use std::time::{Duration, Instant};

const DATABASE: &str = "Database";
const REDIS: &str = "Redis";

#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, descriptor: &str, timeout: Duration) -> ProbeResult;
}

/// Runs `check` bounded by `timeout` and folds its outcome into a
/// [`ProbeResult`]. The clock covers connect, verification and teardown.
pub async fn bounded<F>(service: &'static str, timeout: Duration, check: F) -> ProbeResult
where
    F: Future<Output = Result<(), ProbeError>>,
{
    let start = Instant::now();
    let outcome = match tokio::time::timeout(timeout, check).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(ProbeError::Timeout { service, timeout }),
    };
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(()) => ProbeResult::healthy(duration_ms),
        Err(err) => ProbeResult::unhealthy(duration_ms, err.to_string()),
    }
}

/// PostgreSQL probe: connect, `SELECT 1`, close.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresProbe;

#[async_trait]
impl Probe for PostgresProbe {
    #[tracing::instrument(name = "Probe database.", skip_all)]
    async fn probe(&self, descriptor: &str, timeout: Duration) -> ProbeResult {
        bounded(DATABASE, timeout, check_postgres(descriptor)).await
    }
}

async fn check_postgres(url: &str) -> Result<(), ProbeError> {
    let mut conn = PgConnection::connect(url)
        .await
        .map_err(|err| ProbeError::connection(DATABASE, err))?;

    let verified = conn.execute("SELECT 1").await.map(|_| ());
    // Close regardless of the query outcome. A failed close still drops the socket.
    let closed = conn.close().await;

    verified.map_err(|err| ProbeError::verification(DATABASE, err))?;
    closed.map_err(|err| ProbeError::connection(DATABASE, err))
}

/// Redis probe: connect, `PING`, drop the connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedisProbe;

#[async_trait]
impl Probe for RedisProbe {
    #[tracing::instrument(name = "Probe redis.", skip_all)]
    async fn probe(&self, descriptor: &str, timeout: Duration) -> ProbeResult {
        bounded(REDIS, timeout, check_redis(descriptor)).await
    }
}

async fn check_redis(url: &str) -> Result<(), ProbeError> {
    let client =
        redis::Client::open(url).map_err(|err| ProbeError::connection(REDIS, err))?;
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|err| ProbeError::connection(REDIS, err))?;

    let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
    drop(conn);

    match pong {
        Ok(reply) if reply == "PONG" => Ok(()),
        Ok(reply) => Err(ProbeError::verification(
            REDIS,
            format!("unexpected PING reply {:?}", reply),
        )),
        Err(err) => Err(ProbeError::verification(REDIS, err)),
    }
}
