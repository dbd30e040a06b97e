//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler under `/api/v1` plus the health probes,
//! the shared error schema and the bearer-token security scheme. The document
//! backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, OrderStatus, Role};
use crate::inbound::http::orders::{
    AttachmentResponse, CreateOrderBody, FileUploadBody, MessageResponse, OrderResponse,
    StatusEventResponse, UpdateOrderBody,
};
use crate::inbound::http::users::{CreateUserBody, UpdateUserBody, UserResponse};
use crate::inbound::http::webhooks::{
    CreateWebhookConfigBody, TestWebhookBody, TestWebhookResponse, UpdateWebhookConfigBody,
    WebhookConfigResponse,
};

/// Registers the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Order portal API",
        description = "Order lifecycle, status history, accounts and webhook administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::get_order_history,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::webhooks::create_webhook_config,
        crate::inbound::http::webhooks::list_webhook_configs,
        crate::inbound::http::webhooks::update_webhook_config,
        crate::inbound::http::webhooks::delete_webhook_config,
        crate::inbound::http::webhooks::test_webhook,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        OrderStatus,
        Role,
        FileUploadBody,
        CreateOrderBody,
        UpdateOrderBody,
        OrderResponse,
        AttachmentResponse,
        StatusEventResponse,
        MessageResponse,
        CreateUserBody,
        UpdateUserBody,
        UserResponse,
        CreateWebhookConfigBody,
        UpdateWebhookConfigBody,
        TestWebhookBody,
        TestWebhookResponse,
        WebhookConfigResponse,
    )),
    tags(
        (name = "orders", description = "Order submission and progression"),
        (name = "users", description = "Account management"),
        (name = "webhooks", description = "Webhook subscriber administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
