//! Webhook administration handlers.
//!
//! ```text
//! POST   /api/v1/webhooks/config {"url":"https://hooks.example.com","events":["order.created"]}
//! GET    /api/v1/webhooks/config
//! PUT    /api/v1/webhooks/config/{id}
//! DELETE /api/v1/webhooks/config/{id}
//! POST   /api/v1/webhooks/test {"url":"https://hooks.example.com"}
//! ```

use std::collections::BTreeSet;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, EventType, WebhookConfig, WebhookConfigDraft, WebhookConfigId, WebhookConfigPatch,
    WebhookUrl,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::orders::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field, parse_id};

const CONFIG_ID: FieldName = FieldName::new("webhookConfigId");
const URL: FieldName = FieldName::new("url");
const EVENTS: FieldName = FieldName::new("events");

fn parse_url(raw: &str) -> Result<WebhookUrl, Error> {
    WebhookUrl::parse(raw).map_err(|e| invalid_field(URL, e))
}

fn parse_events(raw: Vec<String>) -> Result<BTreeSet<EventType>, Error> {
    raw.into_iter()
        .map(|tag| EventType::new(tag).map_err(|e| invalid_field(EVENTS, e)))
        .collect()
}

const fn active_by_default() -> bool {
    true
}

/// Request body for `POST /api/v1/webhooks/config`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookConfigBody {
    #[schema(example = "https://hooks.example.com/orders")]
    pub url: String,
    #[schema(example = json!(["order.created", "status.changed"]))]
    pub events: Vec<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

impl TryFrom<CreateWebhookConfigBody> for WebhookConfigDraft {
    type Error = Error;

    fn try_from(value: CreateWebhookConfigBody) -> Result<Self, Self::Error> {
        Ok(Self {
            url: parse_url(&value.url)?,
            events: parse_events(value.events)?,
            active: value.active,
        })
    }
}

/// Request body for `PUT /api/v1/webhooks/config/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookConfigBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl TryFrom<UpdateWebhookConfigBody> for WebhookConfigPatch {
    type Error = Error;

    fn try_from(value: UpdateWebhookConfigBody) -> Result<Self, Self::Error> {
        Ok(Self {
            url: value.url.as_deref().map(parse_url).transpose()?,
            events: value.events.map(parse_events).transpose()?,
            active: value.active,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TestWebhookBody {
    #[schema(example = "https://hooks.example.com/orders")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TestWebhookResponse {
    #[schema(example = "success")]
    pub status: String,
    /// Body returned by the endpoint.
    pub response: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfigResponse {
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WebhookConfig> for WebhookConfigResponse {
    fn from(value: WebhookConfig) -> Self {
        Self {
            id: value.id().to_string(),
            url: value.url().to_string(),
            events: value.events().iter().map(ToString::to_string).collect(),
            active: value.active(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Register a webhook subscriber.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/config",
    request_body = CreateWebhookConfigBody,
    responses(
        (status = 201, description = "Config created", body = WebhookConfigResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "createWebhookConfig",
    security(("BearerToken" = []))
)]
#[post("/webhooks/config")]
pub async fn create_webhook_config(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateWebhookConfigBody>,
) -> ApiResult<HttpResponse> {
    let draft = WebhookConfigDraft::try_from(payload.into_inner())?;
    let config = state.webhooks.create_config(auth.principal(), draft).await?;
    Ok(HttpResponse::Created().json(WebhookConfigResponse::from(config)))
}

/// List webhook subscribers.
#[utoipa::path(
    get,
    path = "/api/v1/webhooks/config",
    responses(
        (status = 200, description = "Configs", body = [WebhookConfigResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "listWebhookConfigs",
    security(("BearerToken" = []))
)]
#[get("/webhooks/config")]
pub async fn list_webhook_configs(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<WebhookConfigResponse>>> {
    let configs = state.webhooks.list_configs(auth.principal()).await?;
    Ok(web::Json(configs.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/api/v1/webhooks/config/{id}",
    params(("id" = String, Path, description = "Webhook config identifier")),
    request_body = UpdateWebhookConfigBody,
    responses(
        (status = 200, description = "Updated config", body = WebhookConfigResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "updateWebhookConfig",
    security(("BearerToken" = []))
)]
#[put("/webhooks/config/{id}")]
pub async fn update_webhook_config(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateWebhookConfigBody>,
) -> ApiResult<web::Json<WebhookConfigResponse>> {
    let id: WebhookConfigId = parse_id(&path, CONFIG_ID)?;
    let patch = WebhookConfigPatch::try_from(payload.into_inner())?;
    let config = state
        .webhooks
        .update_config(auth.principal(), &id, patch)
        .await?;
    Ok(web::Json(config.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/webhooks/config/{id}",
    params(("id" = String, Path, description = "Webhook config identifier")),
    responses(
        (status = 200, description = "Config deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "deleteWebhookConfig",
    security(("BearerToken" = []))
)]
#[delete("/webhooks/config/{id}")]
pub async fn delete_webhook_config(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: WebhookConfigId = parse_id(&path, CONFIG_ID)?;
    state.webhooks.delete_config(auth.principal(), &id).await?;
    Ok(web::Json(MessageResponse::new(
        "Webhook config deleted successfully",
    )))
}

/// Deliver a `test` event synchronously and echo the endpoint's answer.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/test",
    request_body = TestWebhookBody,
    responses(
        (status = 200, description = "Delivery succeeded", body = TestWebhookResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 502, description = "Endpoint failed", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "testWebhook",
    security(("BearerToken" = []))
)]
#[post("/webhooks/test")]
pub async fn test_webhook(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<TestWebhookBody>,
) -> ApiResult<web::Json<TestWebhookResponse>> {
    let url = parse_url(&payload.url)?;
    let delivery = state.webhooks.test_delivery(auth.principal(), &url).await?;
    Ok(web::Json(TestWebhookResponse {
        status: "success".to_owned(),
        response: delivery.response,
    }))
}

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;
