use crate::configuration::Settings;
use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

#[tracing::instrument(name = "Service info.", skip_all)]
#[get("/")]
pub async fn index(settings: web::Data<Settings>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": settings.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": Utc::now(),
        "endpoints": {
            "health": "/health",
            "liveness": "/health/live",
            "readiness": "/health/ready",
            "metrics": "/health/metrics",
        }
    }))
}
