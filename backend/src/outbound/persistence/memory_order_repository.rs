//! In-memory `OrderRepository` adapter.
//!
//! Orders, attachment rows and ledger entries share one lock, so every write
//! the port describes as atomic happens under a single guard.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{OrderListQuery, OrderPersistenceError, OrderRecord, OrderRepository};
use crate::domain::{Attachment, Order, OrderId, StatusEvent};

struct StoredOrder {
    sequence: u64,
    order: Order,
    attachments: Vec<Attachment>,
    events: Vec<StatusEvent>,
}

impl StoredOrder {
    fn record(&self) -> OrderRecord {
        OrderRecord {
            order: self.order.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

#[derive(Default)]
struct Tables {
    next_sequence: u64,
    orders: HashMap<OrderId, StoredOrder>,
}

/// Process-local order store.
#[derive(Default)]
pub struct MemoryOrderRepository {
    tables: RwLock<Tables>,
}

impl MemoryOrderRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(
        &self,
        order: &Order,
        attachments: &[Attachment],
        event: &StatusEvent,
    ) -> Result<(), OrderPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(order.id()) {
            return Err(OrderPersistenceError::query(format!(
                "order {} already exists",
                order.id()
            )));
        }
        let sequence = tables.next_sequence;
        tables.next_sequence += 1;
        tables.orders.insert(
            *order.id(),
            StoredOrder {
                sequence,
                order: order.clone(),
                attachments: attachments.to_vec(),
                events: vec![event.clone()],
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        order: &Order,
        event: Option<StatusEvent>,
    ) -> Result<(), OrderPersistenceError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .orders
            .get_mut(order.id())
            .ok_or_else(|| OrderPersistenceError::missing(order.id().to_string()))?;
        stored.order = order.clone();
        stored.events.extend(event);
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<Option<Vec<Attachment>>, OrderPersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.remove(id).map(|stored| stored.attachments))
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, OrderPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.get(id).map(StoredOrder::record))
    }

    async fn list(&self, query: &OrderListQuery) -> Result<Vec<OrderRecord>, OrderPersistenceError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&StoredOrder> = tables
            .orders
            .values()
            .filter(|stored| query.scope.admits(&stored.order))
            .filter(|stored| {
                query
                    .status
                    .is_none_or(|status| stored.order.status() == status)
            })
            .collect();
        matching.sort_by(|a, b| {
            b.order
                .created_at()
                .cmp(&a.order.created_at())
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(matching.into_iter().map(StoredOrder::record).collect())
    }

    async fn events_for_order(
        &self,
        id: &OrderId,
    ) -> Result<Vec<StatusEvent>, OrderPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .get(id)
            .map(|stored| stored.events.clone())
            .unwrap_or_default())
    }
}
