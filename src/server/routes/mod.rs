//! HTTP route modules

pub mod health;

use actix_web::web;

/// Register every route of the service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
}
