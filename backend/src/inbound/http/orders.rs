//! Order API handlers.
//!
//! ```text
//! POST   /api/v1/orders
//! GET    /api/v1/orders?status=ready
//! GET    /api/v1/orders/{id}
//! GET    /api/v1/orders/{id}/events
//! PUT    /api/v1/orders/{id}
//! DELETE /api/v1/orders/{id}
//! ```
//!
//! Attachments travel inside the JSON body as base64 strings.

use actix_web::{HttpResponse, delete, get, post, put, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateOrderRequest, OrderRecord};
use crate::domain::{
    Attachment, AttachmentUpload, COLOR_MATERIAL_MAX, Error, ItemName, NOTES_MAX, Operation,
    OrderDetails, OrderId, OrderPatch, OrderStatus, Quantity, StatusEvent, optional_text, require,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_base64_error, invalid_field, parse_id, parse_optional_date,
    parse_optional_enum, parse_optional_rfc3339_timestamp,
};

const ORDER_ID: FieldName = FieldName::new("orderId");

/// One uploaded file.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadBody {
    #[schema(example = "cutter.png")]
    pub filename: String,
    #[schema(example = "image/png")]
    pub mime_type: String,
    /// Standard base64 of the file bytes.
    pub content_base64: String,
}

/// Request body for `POST /api/v1/orders`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    #[schema(example = "Round cutter 5cm")]
    pub item_name: String,
    #[schema(example = 3)]
    pub quantity: i64,
    #[serde(default)]
    pub color_material: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    #[schema(example = "2024-06-01")]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub files: Vec<FileUploadBody>,
}

impl CreateOrderBody {
    fn into_request(self) -> Result<CreateOrderRequest, Error> {
        let item_name =
            ItemName::new(self.item_name).map_err(|e| invalid_field(FieldName::new("itemName"), e))?;
        let quantity =
            Quantity::new(self.quantity).map_err(|e| invalid_field(FieldName::new("quantity"), e))?;
        let color_material =
            optional_text("color_material", self.color_material, COLOR_MATERIAL_MAX)
                .map_err(|e| invalid_field(FieldName::new("colorMaterial"), e))?;
        let notes = optional_text("notes", self.notes, NOTES_MAX)
            .map_err(|e| invalid_field(FieldName::new("notes"), e))?;
        let preferred_date = parse_optional_date(
            self.preferred_date.as_deref(),
            FieldName::new("preferredDate"),
        )?;
        let files = self
            .files
            .into_iter()
            .map(decode_file)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CreateOrderRequest {
            details: OrderDetails {
                item_name,
                quantity,
                color_material,
                notes,
                preferred_date,
            },
            files,
        })
    }
}

fn decode_file(file: FileUploadBody) -> Result<AttachmentUpload, Error> {
    let files = FieldName::new("files");
    let content = STANDARD
        .decode(file.content_base64.trim())
        .map_err(|_| invalid_base64_error(files, &file.filename))?;
    AttachmentUpload::new(&file.filename, &file.mime_type, content)
        .map_err(|e| invalid_field(files, e))
}

/// Request body for `PUT /api/v1/orders/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderBody {
    #[serde(default)]
    #[schema(example = "printing")]
    pub status: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub pickup_time: Option<String>,
}

impl UpdateOrderBody {
    fn into_patch(self) -> Result<OrderPatch, Error> {
        Ok(OrderPatch {
            status: parse_optional_enum(self.status.as_deref(), FieldName::new("status"))?,
            pickup_time: parse_optional_rfc3339_timestamp(
                self.pickup_time.as_deref(),
                FieldName::new("pickupTime"),
            )?,
        })
    }
}

/// Query string of `GET /api/v1/orders`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListOrdersParams {
    /// Only orders currently in this status.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentResponse {
    fn from(value: Attachment) -> Self {
        Self {
            id: value.id.to_string(),
            filename: value.filename,
            mime_type: value.mime_type,
            size_bytes: value.size_bytes,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub vendor_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub color_material: Option<String>,
    pub notes: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub pickup_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attachments: Vec<AttachmentResponse>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(value: OrderRecord) -> Self {
        let OrderRecord { order, attachments } = value;
        let details = order.details();
        Self {
            id: order.id().to_string(),
            vendor_id: order.vendor_id().to_string(),
            item_name: details.item_name.as_ref().to_owned(),
            quantity: details.quantity.get(),
            color_material: details.color_material.clone(),
            notes: details.notes.clone(),
            preferred_date: details.preferred_date,
            status: order.status(),
            pickup_time: order.pickup_time(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            attachments: attachments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEventResponse {
    pub id: String,
    pub order_id: String,
    pub actor_id: String,
    pub old_status: Option<OrderStatus>,
    pub new_status: OrderStatus,
    #[schema(example = "status.changed")]
    pub event_type: String,
    pub metadata: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl From<StatusEvent> for StatusEventResponse {
    fn from(value: StatusEvent) -> Self {
        Self {
            id: value.id.to_string(),
            order_id: value.order_id.to_string(),
            actor_id: value.actor_id.to_string(),
            old_status: value.old_status,
            new_status: value.new_status,
            event_type: value.event_type.to_string(),
            metadata: value.metadata,
            recorded_at: value.recorded_at,
        }
    }
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Submit a new order with optional attachments.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 413, description = "Attachment too large", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder",
    security(("BearerToken" = []))
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateOrderBody>,
) -> ApiResult<HttpResponse> {
    // Reject non-vendors before decoding attachments.
    require(auth.principal(), Operation::CreateOrder)?;
    let request = payload.into_inner().into_request()?;
    let record = state.orders.create_order(auth.principal(), request).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(record)))
}

/// List orders visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Orders", body = [OrderResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders",
    security(("BearerToken" = []))
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    auth: Authenticated,
    params: web::Query<ListOrdersParams>,
) -> ApiResult<web::Json<Vec<OrderResponse>>> {
    let status: Option<OrderStatus> =
        parse_optional_enum(params.status.as_deref(), FieldName::new("status"))?;
    let records = state
        .orders_query
        .list_orders(auth.principal(), status)
        .await?;
    Ok(web::Json(records.into_iter().map(Into::into).collect()))
}

/// Fetch one order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder",
    security(("BearerToken" = []))
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id: OrderId = parse_id(&path, ORDER_ID)?;
    let record = state.orders_query.get_order(auth.principal(), &id).await?;
    Ok(web::Json(record.into()))
}

/// Status history of one order, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/events",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Ledger entries", body = [StatusEventResponse]),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrderHistory",
    security(("BearerToken" = []))
)]
#[get("/orders/{id}/events")]
pub async fn get_order_history(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<StatusEventResponse>>> {
    let id: OrderId = parse_id(&path, ORDER_ID)?;
    let events = state
        .orders_query
        .order_history(auth.principal(), &id)
        .await?;
    Ok(web::Json(events.into_iter().map(Into::into).collect()))
}

/// Change an order's status and/or pickup time.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    request_body = UpdateOrderBody,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder",
    security(("BearerToken" = []))
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateOrderBody>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id: OrderId = parse_id(&path, ORDER_ID)?;
    let patch = payload.into_inner().into_patch()?;
    let record = state
        .orders
        .update_order(auth.principal(), &id, patch)
        .await?;
    Ok(web::Json(record.into()))
}

/// Delete an order together with its attachments and history.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder",
    security(("BearerToken" = []))
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: OrderId = parse_id(&path, ORDER_ID)?;
    state.orders.delete_order(auth.principal(), &id).await?;
    Ok(web::Json(MessageResponse::new("Order deleted successfully")))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
