use std::sync::Arc;

use actix_web::web;

mod rate_limiter;
mod url_generator;
mod url_record;

pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use url_generator::UrlGeneratorService;
pub use url_record::{CreateOutcome, UrlRecordService, UrlRecordServiceTrait};

use crate::repositories::UrlRecordRepositoryTrait;

/// Service Register
pub fn register(
    repository: Arc<dyn UrlRecordRepositoryTrait>,
    generator: UrlGeneratorService,
    base_url: &str,
    cfg: &mut web::ServiceConfig,
) {
    let url_record_service = UrlRecordService::new(repository, generator, base_url);
    cfg.app_data(web::Data::new(url_record_service));
}
