//! Order entity and its status lifecycle.
//!
//! Orders move through a fixed sequence of statuses, but staff may set any
//! status at any time: the lifecycle is descriptive rather than enforced.
//! Every change of status is reported as a [`StatusChange`] so callers can
//! record it in the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::UserId;
use super::identifier::define_uuid_identifier;

define_uuid_identifier! {
    /// Stable order identifier.
    OrderId => "order id"
}

/// Production status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Prepping,
    Printing,
    Finished,
    Ready,
    Delivered,
    Archived,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::New,
        OrderStatus::Prepping,
        OrderStatus::Printing,
        OrderStatus::Finished,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Archived,
    ];

    /// Wire name of the status, e.g. `printing`.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Prepping => "prepping",
            OrderStatus::Printing => "printing",
            OrderStatus::Finished => "finished",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not one of the lifecycle values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {input}")]
pub struct ParseOrderStatusError {
    pub input: String,
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ParseOrderStatusError {
                input: s.to_owned(),
            })
    }
}

/// Validation errors for vendor-supplied order fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("item name must not be empty")]
    EmptyItemName,
    #[error("item name must be at most {max} characters")]
    ItemNameTooLong { max: usize },
    #[error("quantity must be a positive integer, got {value}")]
    NonPositiveQuantity { value: i64 },
    #[error("quantity must be at most {max}")]
    QuantityTooLarge { max: u32 },
    #[error("{field} must be at most {max} characters")]
    TextTooLong { field: &'static str, max: usize },
}

/// Maximum length of the item description.
pub const ITEM_NAME_MAX: usize = 255;
/// Maximum length of the combined colour/material field.
pub const COLOR_MATERIAL_MAX: usize = 100;
/// Maximum length of free-text notes.
pub const NOTES_MAX: usize = 4_000;

/// Description of the item being produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and trim an item name.
    pub fn new(value: impl Into<String>) -> Result<Self, OrderValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OrderValidationError::EmptyItemName);
        }
        if trimmed.chars().count() > ITEM_NAME_MAX {
            return Err(OrderValidationError::ItemNameTooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = OrderValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Number of items requested; always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Validate a raw integer, rejecting zero, negatives and values beyond `u32`.
    ///
    /// # Examples
    /// ```
    /// use order_portal::domain::Quantity;
    ///
    /// assert_eq!(Quantity::new(3).map(|q| q.get()), Ok(3));
    /// assert!(Quantity::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, OrderValidationError> {
        if value <= 0 {
            return Err(OrderValidationError::NonPositiveQuantity { value });
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| OrderValidationError::QuantityTooLarge { max: u32::MAX })
    }

    /// The positive quantity.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Normalise an optional free-text field: blank becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, OrderValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(OrderValidationError::TextTooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Vendor-supplied description of what should be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub item_name: ItemName,
    pub quantity: Quantity,
    pub color_material: Option<String>,
    pub notes: Option<String>,
    pub preferred_date: Option<NaiveDate>,
}

/// Staff edit of an order. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub pickup_time: Option<DateTime<Utc>>,
}

/// A status transition produced by [`Order::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub old: OrderStatus,
    pub new: OrderStatus,
}

/// Outcome of applying an [`OrderPatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Set only when the status actually changed.
    pub status_change: Option<StatusChange>,
    /// Set when the patch carried a pickup time.
    pub pickup_scheduled: Option<DateTime<Utc>>,
}

/// A production request submitted by a vendor.
///
/// ## Invariants
/// - `vendor_id` never changes after creation.
/// - A freshly created order is always [`OrderStatus::New`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    vendor_id: UserId,
    details: OrderDetails,
    status: OrderStatus,
    pickup_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order in the initial status.
    pub fn create(id: OrderId, vendor_id: UserId, details: OrderDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vendor_id,
            details,
            status: OrderStatus::New,
            pickup_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Order identifier.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Submitting vendor; never changes.
    pub fn vendor_id(&self) -> &UserId {
        &self.vendor_id
    }

    /// Fields captured at submission.
    pub fn details(&self) -> &OrderDetails {
        &self.details
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Scheduled pickup, if any.
    pub fn pickup_time(&self) -> Option<DateTime<Utc>> {
        self.pickup_time
    }

    /// Submission timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last change.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a staff edit and report what changed.
    ///
    /// `updated_at` is bumped whenever the patch carries any field, even if the
    /// value is unchanged.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use order_portal::domain::{
    ///     ItemName, Order, OrderDetails, OrderId, OrderPatch, OrderStatus, Quantity, UserId,
    /// };
    ///
    /// let details = OrderDetails {
    ///     item_name: ItemName::new("Round cutter 5cm").unwrap(),
    ///     quantity: Quantity::new(3).unwrap(),
    ///     color_material: None,
    ///     notes: None,
    ///     preferred_date: None,
    /// };
    /// let mut order = Order::create(OrderId::random(), UserId::random(), details, Utc::now());
    /// let outcome = order.apply(
    ///     OrderPatch { status: Some(OrderStatus::Printing), pickup_time: None },
    ///     Utc::now(),
    /// );
    /// assert_eq!(outcome.status_change.map(|c| c.new), Some(OrderStatus::Printing));
    /// ```
    pub fn apply(&mut self, patch: OrderPatch, now: DateTime<Utc>) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();
        if let Some(status) = patch.status {
            if status != self.status {
                outcome.status_change = Some(StatusChange {
                    old: self.status,
                    new: status,
                });
                self.status = status;
            }
        }
        if let Some(pickup_time) = patch.pickup_time {
            self.pickup_time = Some(pickup_time);
            outcome.pickup_scheduled = Some(pickup_time);
        }
        if patch.status.is_some() || patch.pickup_time.is_some() {
            self.updated_at = now;
        }
        outcome
    }
}
