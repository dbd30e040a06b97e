//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON bodies into domain requests, call the driving
//! ports held in [`state::HttpState`] and map domain errors back to status
//! codes in [`error`].

pub mod auth;
pub mod error;
pub mod health;
pub mod orders;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod webhooks;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// Register every `/api/v1` endpoint.
///
/// `/users/me` is registered ahead of `/users/{id}` so the literal segment
/// wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(orders::create_order)
            .service(orders::list_orders)
            .service(orders::get_order_history)
            .service(orders::get_order)
            .service(orders::update_order)
            .service(orders::delete_order)
            .service(users::create_user)
            .service(users::list_users)
            .service(users::current_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(webhooks::create_webhook_config)
            .service(webhooks::list_webhook_configs)
            .service(webhooks::update_webhook_config)
            .service(webhooks::delete_webhook_config)
            .service(webhooks::test_webhook),
    );
}
