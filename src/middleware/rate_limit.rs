use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};

use crate::errors::AppError;
use crate::services::{RateLimitDecision, RateLimiter};

/// Gates every wrapped route behind a shared [`RateLimiter`], keyed by the
/// peer address of the connection.
///
/// Rejected requests are answered here with `429` and never reach the handler.
/// With no limiter the middleware passes everything through.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Option<Arc<RateLimiter>>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            limiter: Some(limiter),
        }
    }

    pub fn disabled() -> Self {
        Self { limiter: None }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        })
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Option<Arc<RateLimiter>>,
}

/// Client identifier: the socket peer IP, ignoring forwarding headers
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(limiter) = &self.limiter {
            let client = client_key(&req);
            match limiter.check(&client) {
                RateLimitDecision::Rejected { retry_after_secs } => {
                    warn!(
                        "Rate limit exceeded for {} on {} {}",
                        client,
                        req.method(),
                        req.path()
                    );
                    let response = AppError::RateLimited { retry_after_secs }
                        .error_response()
                        .map_into_right_body();
                    let (request, _payload) = req.into_parts();
                    return Box::pin(async move { Ok(ServiceResponse::new(request, response)) });
                }
                RateLimitDecision::Admitted { remaining } => {
                    debug!("Admitted {} ({} requests left in window)", client, remaining);
                }
            }
        }

        let service = self.service.clone();
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
