use actix_web::{http::header::LOCATION, web, Either, HttpResponse, Responder};
use log::{debug, info};

use crate::{
    models::CreateUrlDto,
    services::{CreateOutcome, UrlRecordService, UrlRecordServiceTrait},
    types::Result,
};

/// `POST /shorten`: accepts a JSON or form body
pub async fn shorten_handler(
    body: Either<web::Json<CreateUrlDto>, web::Form<CreateUrlDto>>,
    service: web::Data<UrlRecordService>,
) -> Result<impl Responder> {
    let dto = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    Ok(match service.create(dto).await? {
        CreateOutcome::Created(created) => HttpResponse::Created().json(created),
        CreateOutcome::Existing(existing) => HttpResponse::Ok().json(existing),
    })
}

/// `GET /{short_code}`: counts the visit and redirects
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<UrlRecordService>,
) -> Result<impl Responder> {
    let short_code = path.into_inner();
    debug!("Redirect requested for code: {}", short_code);

    let record = service.resolve(&short_code).await?;

    info!("Redirecting '{}' to '{}'", short_code, record.long_url);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, record.long_url))
        .finish())
}

/// `GET /stats/{short_code}`
pub async fn stats_handler(
    path: web::Path<String>,
    service: web::Data<UrlRecordService>,
) -> Result<impl Responder> {
    let stats = service.stats(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// `GET /mappings`
pub async fn list_handler(service: web::Data<UrlRecordService>) -> Result<impl Responder> {
    let mappings = service.list().await?;
    Ok(HttpResponse::Ok().json(mappings))
}
