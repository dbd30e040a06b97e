//! Port abstraction for order persistence.
//!
//! Orders, their attachments and their ledger entries live behind one
//! repository so every mutation and the ledger entry describing it are
//! committed in a single storage operation.

use async_trait::async_trait;

use crate::domain::{Attachment, Order, OrderId, OrderScope, OrderStatus, StatusEvent};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// A mutation targeted an order that does not exist.
        Missing { order_id: String } => "order {order_id} does not exist",
    }
}

/// An order together with its attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order: Order,
    pub attachments: Vec<Attachment>,
}

/// Filter applied when listing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderListQuery {
    /// Visibility scope of the caller.
    pub scope: OrderScope,
    /// Optional status filter applied on top of the scope.
    pub status: Option<OrderStatus>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order, its attachment rows and its creation entry atomically.
    async fn create(
        &self,
        order: &Order,
        attachments: &[Attachment],
        event: &StatusEvent,
    ) -> Result<(), OrderPersistenceError>;

    /// Replace an existing order, appending `event` in the same operation.
    ///
    /// Fails with [`OrderPersistenceError::Missing`] when the order is gone.
    async fn update(
        &self,
        order: &Order,
        event: Option<StatusEvent>,
    ) -> Result<(), OrderPersistenceError>;

    /// Remove an order with its attachments and ledger entries.
    ///
    /// Returns the removed attachments so stored files can be cleaned up, or
    /// `None` when the order did not exist.
    async fn delete(&self, id: &OrderId) -> Result<Option<Vec<Attachment>>, OrderPersistenceError>;

    /// Fetch an order and its attachments.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, OrderPersistenceError>;

    /// List orders matching `query`, newest first.
    async fn list(&self, query: &OrderListQuery) -> Result<Vec<OrderRecord>, OrderPersistenceError>;

    /// Ledger entries for an order in insertion order.
    async fn events_for_order(
        &self,
        id: &OrderId,
    ) -> Result<Vec<StatusEvent>, OrderPersistenceError>;
}
