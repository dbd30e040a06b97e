//! Test utilities shared by unit tests across the crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    DisplayName, Email, ItemName, OrderDetails, Principal, Quantity, Role, User, UserId,
};

/// Fixed instant used as the default "now" in tests.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp must be unambiguous"))
}

/// Clock returning a fixed start instant advanced by `step` on every read.
///
/// A zero step yields a frozen clock, which is how tests exercise timestamp ties.
pub struct FixtureClock {
    start: DateTime<Utc>,
    step_millis: i64,
    reads: AtomicI64,
}

impl FixtureClock {
    pub fn frozen() -> Arc<dyn Clock> {
        Arc::new(Self {
            start: fixture_timestamp(),
            step_millis: 0,
            reads: AtomicI64::new(0),
        })
    }

    pub fn stepping(step: Duration) -> Arc<dyn Clock> {
        Arc::new(Self {
            start: fixture_timestamp(),
            step_millis: step.num_milliseconds(),
            reads: AtomicI64::new(0),
        })
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let reads = self.reads.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::milliseconds(reads * self.step_millis)
    }
}

pub fn principal(role: Role) -> Principal {
    Principal::new(UserId::random(), role)
}

pub fn user_with(principal: &Principal, email: &str) -> User {
    User::new(
        principal.id,
        DisplayName::new(format!("{} user", principal.role)).expect("valid display name"),
        Email::new(email).expect("valid email"),
        principal.role,
        fixture_timestamp(),
    )
}

pub fn cutter_details() -> OrderDetails {
    OrderDetails {
        item_name: ItemName::new("Round cutter 5cm").expect("valid item name"),
        quantity: Quantity::new(3).expect("valid quantity"),
        color_material: None,
        notes: None,
        preferred_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1),
    }
}
