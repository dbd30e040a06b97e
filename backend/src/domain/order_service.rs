//! Order lifecycle service.
//!
//! Implements the order driving ports: role checks first, then validation,
//! then a single repository call carrying both the mutation and its ledger
//! entry, and finally fire-and-forget webhook notifications.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::ports::{
    AttachmentStore, AttachmentStoreError, CreateOrderRequest, OrderCommand, OrderListQuery,
    OrderPersistenceError, OrderQuery, OrderRecord, OrderRepository, WebhookNotifier,
};
use crate::domain::{
    Attachment, AttachmentPolicy, AttachmentRejection, Error, EventType, Operation, Order,
    OrderId, OrderPatch, OrderScope, OrderStatus, Principal, StatusEvent, StatusLedger,
    StorageLocator, require,
};

fn map_repository_error(error: OrderPersistenceError) -> Error {
    match error {
        OrderPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderPersistenceError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderPersistenceError::Missing { order_id } => {
            Error::not_found(format!("order {order_id} not found"))
        }
    }
}

fn map_store_error(error: AttachmentStoreError) -> Error {
    match error {
        AttachmentStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("attachment storage unavailable: {message}"))
        }
        other => Error::internal(format!("attachment storage error: {other}")),
    }
}

fn map_rejection(rejection: AttachmentRejection) -> Error {
    let message = rejection.to_string();
    match rejection {
        AttachmentRejection::FileTooLarge {
            filename,
            size_bytes,
            max_bytes,
        } => Error::payload_too_large(message).with_details(json!({
            "field": "files",
            "filename": filename,
            "sizeBytes": size_bytes,
            "maxBytes": max_bytes,
            "code": "file_too_large",
        })),
        AttachmentRejection::UnsupportedType {
            filename,
            mime_type,
        } => Error::invalid_request(message).with_details(json!({
            "field": "files",
            "filename": filename,
            "mimeType": mime_type,
            "code": "unsupported_type",
        })),
        AttachmentRejection::EmptyFilename => Error::invalid_request(message)
            .with_details(json!({"field": "files", "code": "empty_filename"})),
    }
}

fn order_payload(order: &Order) -> Value {
    json!({
        "order_id": order.id().to_string(),
        "vendor_id": order.vendor_id().to_string(),
        "item_name": order.details().item_name.as_ref(),
        "quantity": order.details().quantity.get(),
        "status": order.status(),
        "pickup_time": order.pickup_time(),
    })
}

fn transition_payload(event: &StatusEvent) -> Value {
    json!({
        "order_id": event.order_id.to_string(),
        "actor_id": event.actor_id.to_string(),
        "old_status": event.old_status,
        "new_status": event.new_status,
        "recorded_at": event.recorded_at,
    })
}

/// Order service implementing [`OrderCommand`] and [`OrderQuery`].
#[derive(Clone)]
pub struct OrderService<R, S> {
    orders: Arc<R>,
    store: Arc<S>,
    notifier: Arc<dyn WebhookNotifier>,
    ledger: StatusLedger,
    policy: AttachmentPolicy,
    clock: Arc<dyn Clock>,
}

impl<R, S> OrderService<R, S> {
    /// Wire the service to its repository, file store, notifier and policy.
    pub fn new(
        orders: Arc<R>,
        store: Arc<S>,
        notifier: Arc<dyn WebhookNotifier>,
        policy: AttachmentPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            store,
            notifier,
            ledger: StatusLedger::new(clock.clone()),
            policy,
            clock,
        }
    }
}

impl<R, S> OrderService<R, S>
where
    R: OrderRepository,
    S: AttachmentStore,
{
    /// Remove files written earlier in a request that is now failing.
    fn discard_written(&self, written: &[&StorageLocator]) {
        for locator in written {
            if let Err(error) = self.store.remove(locator) {
                warn!(locator = %locator, error = %error, "failed to discard attachment after aborted upload");
            }
        }
    }

    fn write_files(
        &self,
        request: &CreateOrderRequest,
        attachments: &[Attachment],
    ) -> Result<(), Error> {
        let mut written = Vec::with_capacity(attachments.len());
        for (attachment, upload) in attachments.iter().zip(&request.files) {
            if let Err(error) = self.store.write(&attachment.locator, upload.content()) {
                self.discard_written(&written);
                return Err(map_store_error(error));
            }
            written.push(&attachment.locator);
        }
        Ok(())
    }

    /// Load an order and check that `principal` may see it.
    async fn visible_order(
        &self,
        principal: &Principal,
        id: &OrderId,
    ) -> Result<OrderRecord, Error> {
        require(principal, Operation::ViewOrders)?;
        let record = self
            .orders
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))?;
        if !OrderScope::for_principal(principal).admits(&record.order) {
            return Err(Error::forbidden("you may not view this order"));
        }
        Ok(record)
    }
}

#[async_trait]
impl<R, S> OrderCommand for OrderService<R, S>
where
    R: OrderRepository,
    S: AttachmentStore,
{
    async fn create_order(
        &self,
        principal: &Principal,
        request: CreateOrderRequest,
    ) -> Result<OrderRecord, Error> {
        require(principal, Operation::CreateOrder)?;
        for upload in &request.files {
            self.policy.check(upload).map_err(map_rejection)?;
        }

        let now = self.clock.utc();
        let order = Order::create(OrderId::random(), principal.id, request.details.clone(), now);
        let attachments: Vec<Attachment> = request
            .files
            .iter()
            .map(|upload| Attachment::for_upload(*order.id(), upload, now))
            .collect();
        self.write_files(&request, &attachments)?;

        let event = self.ledger.order_created(&order, principal.id);
        if let Err(error) = self.orders.create(&order, &attachments, &event).await {
            let written: Vec<&StorageLocator> = attachments.iter().map(|a| &a.locator).collect();
            self.discard_written(&written);
            return Err(map_repository_error(error));
        }

        info!(
            order_id = %order.id(),
            vendor_id = %principal.id,
            attachments = attachments.len(),
            "order created"
        );
        self.notifier
            .notify(EventType::order_created(), order_payload(&order));
        Ok(OrderRecord { order, attachments })
    }

    async fn update_order(
        &self,
        principal: &Principal,
        id: &OrderId,
        patch: OrderPatch,
    ) -> Result<OrderRecord, Error> {
        require(principal, Operation::UpdateOrder)?;
        let mut record = self
            .orders
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))?;

        let outcome = record.order.apply(patch, self.clock.utc());
        let event = outcome
            .status_change
            .map(|change| self.ledger.status_changed(*id, principal.id, change));
        self.orders
            .update(&record.order, event.clone())
            .await
            .map_err(map_repository_error)?;

        if let Some(event) = &event {
            info!(
                order_id = %id,
                old_status = ?event.old_status,
                new_status = %event.new_status,
                "order status changed"
            );
            self.notifier
                .notify(EventType::status_changed(), transition_payload(event));
            if event.new_status == OrderStatus::Ready {
                self.notifier
                    .notify(EventType::order_ready(), order_payload(&record.order));
            }
        }
        if outcome.pickup_scheduled.is_some() {
            self.notifier
                .notify(EventType::pickup_scheduled(), order_payload(&record.order));
        }
        Ok(record)
    }

    async fn delete_order(&self, principal: &Principal, id: &OrderId) -> Result<(), Error> {
        require(principal, Operation::DeleteOrder)?;
        let removed = self
            .orders
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))?;

        for attachment in &removed {
            if let Err(error) = self.store.remove(&attachment.locator) {
                warn!(
                    order_id = %id,
                    locator = %attachment.locator,
                    error = %error,
                    "failed to remove attachment file"
                );
            }
        }

        info!(order_id = %id, attachments = removed.len(), "order deleted");
        self.notifier.notify(
            EventType::order_deleted(),
            json!({"order_id": id.to_string(), "actor_id": principal.id.to_string()}),
        );
        Ok(())
    }
}

#[async_trait]
impl<R, S> OrderQuery for OrderService<R, S>
where
    R: OrderRepository,
    S: AttachmentStore,
{
    async fn list_orders(
        &self,
        principal: &Principal,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, Error> {
        require(principal, Operation::ViewOrders)?;
        let query = OrderListQuery {
            scope: OrderScope::for_principal(principal),
            status,
        };
        self.orders.list(&query).await.map_err(map_repository_error)
    }

    async fn get_order(&self, principal: &Principal, id: &OrderId) -> Result<OrderRecord, Error> {
        self.visible_order(principal, id).await
    }

    async fn order_history(
        &self,
        principal: &Principal,
        id: &OrderId,
    ) -> Result<Vec<StatusEvent>, Error> {
        self.visible_order(principal, id).await?;
        let events = self
            .orders
            .events_for_order(id)
            .await
            .map_err(map_repository_error)?;
        Ok(StatusLedger::chronological(events))
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
