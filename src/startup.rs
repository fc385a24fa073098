use crate::configuration::Settings;
use crate::health::{HealthChecker, HealthMetrics, TracingEventSink};
use crate::routes;
use actix_cors::Cors;
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{middleware, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;
use tracing_actix_web::TracingLogger;

/// Probe outcomes kept for `/health/metrics`.
const METRICS_HISTORY: usize = 1000;

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let health_settings = settings
        .health_checks()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let checker = HealthChecker::from_settings(&health_settings, Arc::new(TracingEventSink));
    tracing::info!(
        dependencies = ?checker.dependency_names(),
        "Configured health check dependencies"
    );

    run_with_checker(listener, settings, checker).await
}

/// Same as [`run`], with the dependency set supplied by the caller.
pub async fn run_with_checker(
    listener: TcpListener,
    settings: Settings,
    checker: HealthChecker,
) -> Result<Server, std::io::Error> {
    let settings = web::Data::new(settings);
    let health_checker = web::Data::new(checker);
    let health_metrics = web::Data::new(HealthMetrics::new(METRICS_HISTORY));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .wrap_fn(|req, srv| {
                let started = Instant::now();
                let fut = srv.call(req);
                async move {
                    let mut res = fut.await?;
                    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                    if let Ok(value) = HeaderValue::from_str(&format!("{:.2}ms", elapsed_ms)) {
                        res.headers_mut()
                            .insert(HeaderName::from_static("x-response-time"), value);
                    }
                    Ok(res)
                }
            })
            .wrap(middleware::NormalizePath::trim())
            .app_data(health_checker.clone())
            .app_data(health_metrics.clone())
            .app_data(settings.clone())
            .service(routes::index)
            .service(
                web::scope("/health")
                    .service(routes::health_check)
                    .service(routes::liveness_check)
                    .service(routes::readiness_check)
                    .service(routes::health_metrics),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
