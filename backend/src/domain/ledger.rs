//! Status event ledger: builds append-only entries and orders history.
//!
//! The ledger never persists anything on its own. Entries are handed to the
//! order repository together with the mutation they describe so both land in
//! one storage operation.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;

use super::{
    EventType, Order, OrderId, OrderStatus, StatusChange, StatusEvent, StatusEventId, UserId,
};

/// Factory for [`StatusEvent`] values stamped by an injected clock.
#[derive(Clone)]
pub struct StatusLedger {
    clock: Arc<dyn Clock>,
}

impl StatusLedger {
    /// Create a ledger stamping entries with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Build one ledger entry.
    pub fn record(
        &self,
        order_id: OrderId,
        actor_id: UserId,
        old_status: Option<OrderStatus>,
        new_status: OrderStatus,
        event_type: EventType,
        metadata: Option<Value>,
    ) -> StatusEvent {
        StatusEvent {
            id: StatusEventId::random(),
            order_id,
            actor_id,
            old_status,
            new_status,
            event_type,
            metadata,
            recorded_at: self.clock.utc(),
        }
    }

    /// Creation entry: no previous status.
    pub fn order_created(&self, order: &Order, actor_id: UserId) -> StatusEvent {
        self.record(
            *order.id(),
            actor_id,
            None,
            order.status(),
            EventType::order_created(),
            None,
        )
    }

    /// Transition entry carrying both sides of the change.
    pub fn status_changed(
        &self,
        order_id: OrderId,
        actor_id: UserId,
        change: StatusChange,
    ) -> StatusEvent {
        self.record(
            order_id,
            actor_id,
            Some(change.old),
            change.new,
            EventType::status_changed(),
            None,
        )
    }

    /// Order entries chronologically. Input must be in insertion order; the
    /// stable sort keeps that order for equal timestamps.
    pub fn chronological(mut events: Vec<StatusEvent>) -> Vec<StatusEvent> {
        events.sort_by_key(|event| event.recorded_at);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixtureClock, cutter_details, fixture_timestamp};
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use serde_json::json;

    fn order() -> Order {
        Order::create(
            OrderId::random(),
            UserId::random(),
            cutter_details(),
            Utc::now(),
        )
    }

    #[rstest]
    fn creation_entry_has_no_previous_status() {
        let ledger = StatusLedger::new(FixtureClock::frozen());
        let order = order();
        let actor = *order.vendor_id();

        let event = ledger.order_created(&order, actor);

        assert_eq!(event.old_status, None);
        assert_eq!(event.new_status, OrderStatus::New);
        assert_eq!(event.event_type, EventType::order_created());
        assert_eq!(event.actor_id, actor);
        assert_eq!(event.recorded_at, fixture_timestamp());
    }

    #[rstest]
    fn transition_entry_carries_both_statuses() {
        let ledger = StatusLedger::new(FixtureClock::frozen());
        let order_id = OrderId::random();

        let event = ledger.status_changed(
            order_id,
            UserId::random(),
            StatusChange {
                old: OrderStatus::New,
                new: OrderStatus::Printing,
            },
        );

        assert_eq!(event.order_id, order_id);
        assert_eq!(event.old_status, Some(OrderStatus::New));
        assert_eq!(event.new_status, OrderStatus::Printing);
        assert_eq!(event.event_type, EventType::status_changed());
    }

    #[rstest]
    fn record_keeps_metadata_and_issues_fresh_ids() {
        let ledger = StatusLedger::new(FixtureClock::frozen());
        let metadata = json!({"reason": "reprint"});
        let first = ledger.record(
            OrderId::random(),
            UserId::random(),
            Some(OrderStatus::Finished),
            OrderStatus::Printing,
            EventType::status_changed(),
            Some(metadata.clone()),
        );
        let second = ledger.order_created(&order(), UserId::random());

        assert_eq!(first.metadata, Some(metadata));
        assert_ne!(first.id, second.id);
    }

    #[rstest]
    fn chronological_breaks_ties_by_insertion_order() {
        let ledger = StatusLedger::new(FixtureClock::frozen());
        let order = order();
        let created = ledger.order_created(&order, *order.vendor_id());
        let changed = ledger.status_changed(
            *order.id(),
            UserId::random(),
            StatusChange {
                old: OrderStatus::New,
                new: OrderStatus::Prepping,
            },
        );
        let expected = vec![created.id, changed.id];

        let ordered = StatusLedger::chronological(vec![created, changed]);

        assert_eq!(ordered.iter().map(|e| e.id).collect::<Vec<_>>(), expected);
    }

    #[rstest]
    fn chronological_sorts_by_timestamp() {
        let ledger = StatusLedger::new(FixtureClock::stepping(Duration::seconds(1)));
        let order = order();
        let earlier = ledger.order_created(&order, *order.vendor_id());
        let later = ledger.status_changed(
            *order.id(),
            UserId::random(),
            StatusChange {
                old: OrderStatus::New,
                new: OrderStatus::Ready,
            },
        );

        let ordered = StatusLedger::chronological(vec![later.clone(), earlier.clone()]);

        assert_eq!(ordered, vec![earlier, later]);
    }
}
