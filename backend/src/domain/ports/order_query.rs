//! Driving port for order reads, scoped by the caller's role.

use async_trait::async_trait;

use crate::domain::{Error, OrderId, OrderStatus, Principal, StatusEvent};

use super::OrderRecord;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Orders visible to `principal`, optionally narrowed by status, newest first.
    async fn list_orders(
        &self,
        principal: &Principal,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, Error>;

    /// A single order; not found before forbidden.
    async fn get_order(&self, principal: &Principal, id: &OrderId) -> Result<OrderRecord, Error>;

    /// The ledger of an order, chronologically, under the same visibility rules.
    async fn order_history(
        &self,
        principal: &Principal,
        id: &OrderId,
    ) -> Result<Vec<StatusEvent>, Error>;
}
