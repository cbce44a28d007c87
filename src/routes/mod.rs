use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::{
    errors::AppError,
    middleware::RateLimit,
    types::{AppState, HealthStatus},
};

mod url_record;

const MAX_BODY_BYTES: usize = 32 * 1024;

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().as_secs();

    let db_health = match &data.db {
        Some(db) => Some(db.ping().await),
        None => None,
    };

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        storage: if data.db.is_some() { "postgres" } else { "memory" }.to_string(),
        db_health,
        rate_limited_clients: data.limiter.as_ref().map(|l| l.tracked_clients()),
        uptime_seconds: uptime,
    };

    HttpResponse::Ok().json(status)
}

fn body_error(message: String, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(message).into()
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimit) {
    // Malformed bodies get the same `{"error": ...}` shape as everything else
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .content_type_required(false)
            .error_handler(|err, req| body_error(format!("Invalid JSON body: {}", err), req)),
    )
    .app_data(
        web::FormConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, req| body_error(format!("Invalid form body: {}", err), req)),
    );

    // Not rate limited so probes never see 429
    cfg.route("/health", web::get().to(health_check));
    url_record::configure_routes(cfg, rate_limit);
}
