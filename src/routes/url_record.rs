use actix_web::web;

use crate::{
    handlers::{list_handler, redirect_handler, shorten_handler, stats_handler},
    middleware::RateLimit,
};

/// Public shortener routes, all behind the rate limiter.
///
/// The catch-all `/{short_code}` is registered last so literal paths win.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimit) {
    cfg.service(
        web::scope("")
            .wrap(rate_limit)
            .route("/shorten", web::post().to(shorten_handler))
            .route("/mappings", web::get().to(list_handler))
            .route("/stats/{short_code}", web::get().to(stats_handler))
            .route("/{short_code}", web::get().to(redirect_handler)),
    );
}
