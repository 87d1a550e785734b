//! Error capture middleware
//!
//! Every failure leaving a handler, including panics, is classified and run
//! through recovery. The client always receives the error envelope carrying
//! the record id, whether or not a recovery strategy succeeded.

use super::helpers::{TrackedRequest, failure_from_error, failure_from_panic, request_context};
use crate::monitoring::panic_message;
use crate::server::state::AppState;
use crate::utils::error::{ErrorResponse, HandledError};
use actix_web::HttpMessage;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web;
use futures::FutureExt;
use futures::future::{Ready, ready};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

/// Classifies failures and renders the error envelope
pub struct ErrorCaptureMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ErrorCaptureMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = ErrorCaptureMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorCaptureMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for error capture middleware
pub struct ErrorCaptureMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorCaptureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        };

        // Routing needs sole ownership of the request, so only owned data is kept
        let ctx = request_context(req.request());
        let tracked = req.extensions().get::<TrackedRequest>().cloned();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await;

            let (failure, original) = match outcome {
                Ok(Ok(res)) => {
                    let failure = res.response().error().map(failure_from_error);
                    match failure {
                        Some(failure) => (failure, Some(res)),
                        None => return Ok(res.map_into_left_body()),
                    }
                }
                Ok(Err(e)) => (failure_from_error(&e), None),
                Err(payload) => (failure_from_panic(&panic_message(payload.as_ref())), None),
            };

            if let Some(TrackedRequest(id)) = &tracked {
                state.requests().record_error(id, failure.message.clone());
            }

            let request_id = ctx.request_id.clone();
            let record = state.errors().handle(failure, ctx).await;
            if record.recovered {
                debug!("Error {} recovered", record.id);
            }

            let envelope = ErrorResponse::from_record(&record, state.config().expose_stack());
            match original {
                Some(res) => {
                    let (http_req, _) = res.into_parts();
                    let response =
                        envelope.into_http_response(record.status_code, record.retry_after());
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                None => Err(HandledError::new(
                    envelope,
                    record.status_code,
                    record.retry_after(),
                    request_id,
                )
                .into()),
            }
        })
    }
}
