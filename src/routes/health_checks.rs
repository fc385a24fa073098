use crate::health::{HealthChecker, HealthMetrics};
use actix_web::{get, http::StatusCode, web, HttpResponse};

#[tracing::instrument(name = "Full health check.", skip_all)]
#[get("")]
pub async fn health_check(
    checker: web::Data<HealthChecker>,
    metrics: web::Data<HealthMetrics>,
) -> HttpResponse {
    let report = checker.health_report().await;
    metrics.record_checks(&report.checks).await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status).json(report)
}

#[tracing::instrument(name = "Liveness check.")]
#[get("/live")]
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthChecker::liveness_report())
}

#[tracing::instrument(name = "Readiness check.", skip_all)]
#[get("/ready")]
pub async fn readiness_check(
    checker: web::Data<HealthChecker>,
    metrics: web::Data<HealthMetrics>,
) -> HttpResponse {
    let report = checker.readiness_report().await;
    metrics.record_checks(&report.checks).await;

    let status = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status).json(report)
}

#[tracing::instrument(name = "Health metrics.", skip_all)]
#[get("/metrics")]
pub async fn health_metrics(metrics: web::Data<HealthMetrics>) -> HttpResponse {
    HttpResponse::Ok().json(metrics.get_all_stats().await)
}
