//! Metrics middleware for request monitoring

use super::helpers::{TrackedRequest, is_textual, request_meta};
use crate::server::state::AppState;
use actix_web::HttpMessage;
use actix_web::body::{BodySize, MessageBody};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::web::{self, BytesMut};
use futures::StreamExt;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

/// Bodies above this declared size are passed through without being captured
const BODY_CAPTURE_LIMIT: usize = 1024 * 1024;

/// Times every request through the request aggregator
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for metrics middleware
pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(state) = app_state else {
                return service.call(req).await;
            };
            let requests = state.requests().clone();
            if requests.is_excluded(req.path()) {
                return service.call(req).await;
            }

            let mut meta = request_meta(req.request());
            if wants_body(&req) {
                meta.body = capture_body(&mut req).await;
            }

            let Some(request_id) = requests.on_request_start(meta) else {
                return service.call(req).await;
            };
            req.extensions_mut()
                .insert(TrackedRequest(request_id.clone()));

            match service.call(req).await {
                Ok(res) => {
                    let status_code = res.status().as_u16();
                    let size = match res.response().body().size() {
                        BodySize::Sized(n) => Some(n),
                        _ => None,
                    };
                    requests
                        .on_request_finish(&request_id, status_code, size)
                        .await;
                    Ok(res)
                }
                Err(e) => {
                    // Errors escaping the chain are rendered by actix from here on
                    let status_code = e.as_response_error().status_code().as_u16();
                    requests.record_error(&request_id, e.to_string());
                    requests
                        .on_request_finish(&request_id, status_code, None)
                        .await;
                    Err(e)
                }
            }
        })
    }
}

fn wants_body(req: &ServiceRequest) -> bool {
    let textual = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(is_textual);
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    textual && declared.is_some_and(|len| len > 0 && len <= BODY_CAPTURE_LIMIT)
}

/// Drain the payload, keep a copy and put it back for the handler
async fn capture_body(req: &mut ServiceRequest) -> Option<String> {
    let mut payload = req.take_payload();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) => buffer.extend_from_slice(&chunk),
            Err(e) => {
                warn!("Failed to read request body for logging: {}", e);
                break;
            }
        }
    }

    let bytes = buffer.freeze();
    let body = String::from_utf8_lossy(&bytes).into_owned();
    debug!("Captured {} byte request body", bytes.len());
    req.set_payload(Payload::from(bytes));
    Some(body)
}
