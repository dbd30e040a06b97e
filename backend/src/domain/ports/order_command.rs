//! Driving port for order mutations.
//!
//! Inbound adapters call this port after resolving the principal; role checks,
//! validation, ledger writes and webhook notifications all happen behind it.

use async_trait::async_trait;

use crate::domain::{AttachmentUpload, Error, OrderDetails, OrderId, OrderPatch, Principal};

use super::OrderRecord;

/// Request to submit a new order with its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub details: OrderDetails,
    pub files: Vec<AttachmentUpload>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Submit an order as its vendor. Every file is checked before anything
    /// is written; the order starts in `new` with a creation ledger entry.
    async fn create_order(
        &self,
        principal: &Principal,
        request: CreateOrderRequest,
    ) -> Result<OrderRecord, Error>;

    /// Apply a staff edit. A status change yields exactly one ledger entry.
    async fn update_order(
        &self,
        principal: &Principal,
        id: &OrderId,
        patch: OrderPatch,
    ) -> Result<OrderRecord, Error>;

    /// Remove an order, its attachments and its ledger, then its files.
    async fn delete_order(&self, principal: &Principal, id: &OrderId) -> Result<(), Error>;
}
