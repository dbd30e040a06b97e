//! Domain primitives, policies and services.
//!
//! Purpose: define the order lifecycle, the status ledger, the access policy
//! and the services implementing the driving ports. Nothing here knows about
//! HTTP, disks or sockets; those concerns sit behind [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Order, OrderStatus, StatusEvent: the lifecycle and its ledger.
//! - Principal, authorize: the role policy.
//! - OrderService, UserService, WebhookService: driving port implementations.

pub mod access;
pub mod attachment;
pub mod error;
pub(crate) mod identifier;
pub mod ledger;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod status_event;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod webhook;
pub mod webhook_service;

pub use self::access::{
    Decision, Operation, OrderScope, Principal, authorize, can_view_user, require,
};
pub use self::attachment::{
    Attachment, AttachmentId, AttachmentPolicy, AttachmentRejection, AttachmentUpload,
    DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_FILE_SIZE, StorageLocator,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifier::InvalidIdentifier;
pub use self::ledger::StatusLedger;
pub use self::order::{
    ItemName, NOTES_MAX, Order, OrderDetails, OrderId, OrderPatch, OrderStatus,
    OrderValidationError, ParseOrderStatusError, PatchOutcome, Quantity, COLOR_MATERIAL_MAX,
    StatusChange, optional_text,
};
pub use self::order_service::OrderService;
pub use self::status_event::{EventType, EventTypeValidationError, StatusEvent, StatusEventId};
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, Email, ParseRoleError, Role, User, UserDraft, UserId, UserPatch,
    UserValidationError,
};
pub use self::user_service::UserService;
pub use self::webhook::{
    DEFAULT_WEBHOOK_QUEUE_CAPACITY, DEFAULT_WEBHOOK_TIMEOUT, WebhookConfig, WebhookConfigDraft,
    WebhookConfigId, WebhookConfigPatch, WebhookDeliverySettings, WebhookEnvelope, WebhookUrl,
    WebhookUrlError,
};
pub use self::webhook_service::WebhookService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use order_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
