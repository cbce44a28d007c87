use std::sync::Arc;
use std::time::Instant;

use actix_cors::Cors;
use actix_web::{
    dev::Service as _,
    http::header::{HeaderName, HeaderValue},
    middleware::Logger,
    web, App, HttpServer,
};
use log::{debug, info};

use crate::{
    config::{Config, Environment, StorageBackend},
    db::Database,
    middleware::{RateLimit, RequestLogger},
    repositories::{InMemoryUrlRecordRepository, UrlRecordRepository, UrlRecordRepositoryTrait},
    routes,
    services::{self, RateLimiter, UrlGeneratorService},
    telemetry,
    types::{AppState, Result},
};

fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600);

    match &config.cors_allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

pub async fn server() -> Result<()> {
    let config = Config::load()?;
    telemetry::setup_logging(&config)?;

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers, short URLs under {}",
        config.server.host, config.server.port, config.server.workers, config.server.base_url
    );

    if config.app.environment == Environment::Development {
        debug!("Full configuration: {:?}", config);
    }

    // Store: one pool (or map) shared by every worker
    let (database, repository): (Option<Database>, Arc<dyn UrlRecordRepositoryTrait>) =
        match config.storage {
            StorageBackend::Postgres => {
                let db = Database::connect(&config.db).await?;
                let repository = Arc::new(UrlRecordRepository::new(&db));
                (Some(db), repository)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; records are lost on restart");
                (None, Arc::new(InMemoryUrlRecordRepository::new()))
            }
        };

    // Limiter lives exactly as long as the server
    let limiter = config
        .rate_limit
        .enabled
        .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));
    match &limiter {
        Some(_) => info!(
            "Rate limiting: {} requests per {}s per client",
            config.rate_limit.max_requests, config.rate_limit.window_seconds
        ),
        None => info!("Rate limiting disabled"),
    }

    let generator = UrlGeneratorService::from_config(&config.short_code);
    let enable_debug_logging = config.app.environment != Environment::Production;
    let log_format = telemetry::access_log_format(&config.app.environment);

    let app_config = config.clone();
    let state_db = database.clone();

    HttpServer::new(move || {
        let rate_limit = match &limiter {
            Some(limiter) => RateLimit::new(limiter.clone()),
            None => RateLimit::disabled(),
        };

        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                version: app_config.app.version.clone(),
                db: state_db.clone(),
                limiter: limiter.clone(),
            }))
            .configure(|cfg| {
                services::register(
                    repository.clone(),
                    generator.clone(),
                    &app_config.server.base_url,
                    cfg,
                )
            })
            .wrap(RequestLogger::new(enable_debug_logging))
            // Request tracking ID, fresh per request
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    let mut res = fut.await?;
                    if let Ok(value) = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
                        res.headers_mut()
                            .insert(HeaderName::from_static("x-request-id"), value);
                    }
                    Ok(res)
                }
            })
            .wrap(Logger::new(log_format))
            .wrap(build_cors(&app_config))
            .configure(|cfg| routes::configure_routes(cfg, rate_limit))
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server stopped");
    Ok(())
}
