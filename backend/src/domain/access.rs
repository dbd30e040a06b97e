//! Role-based access policy.
//!
//! [`authorize`] answers purely role-gated questions before any lookup.
//! Visibility of a specific order or user depends on the record itself and is
//! answered by [`OrderScope::admits`] and [`can_view_user`] once the record has
//! been loaded, so that a missing record is reported as not found rather than
//! forbidden.

use super::{Error, Order, OrderStatus, Role, UserId};

/// The authenticated actor performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    /// Principal for `id` acting with `role`.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Operations subject to role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrder,
    ViewOrders,
    UpdateOrder,
    DeleteOrder,
    ManageUsers,
    ViewOwnProfile,
    ManageWebhooks,
}

impl Operation {
    fn describe(self) -> &'static str {
        match self {
            Operation::CreateOrder => "create orders",
            Operation::ViewOrders => "view orders",
            Operation::UpdateOrder => "update orders",
            Operation::DeleteOrder => "delete orders",
            Operation::ManageUsers => "manage users",
            Operation::ViewOwnProfile => "view your profile",
            Operation::ManageWebhooks => "manage webhooks",
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// Convert a denial into a [`Error::forbidden`] carrying `message`.
    pub fn or_forbidden(self, message: impl Into<String>) -> Result<(), Error> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(Error::forbidden(message)),
        }
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Closed policy table mapping roles to operations.
///
/// # Examples
/// ```
/// use order_portal::domain::{Decision, Operation, Role, authorize};
///
/// assert_eq!(authorize(Role::Vendor, Operation::CreateOrder), Decision::Allow);
/// assert_eq!(authorize(Role::Viewer, Operation::UpdateOrder), Decision::Deny);
/// ```
pub fn authorize(role: Role, operation: Operation) -> Decision {
    let allowed = match operation {
        Operation::CreateOrder => role == Role::Vendor,
        Operation::ViewOrders | Operation::ViewOwnProfile => true,
        Operation::UpdateOrder | Operation::DeleteOrder => role.is_staff(),
        Operation::ManageUsers | Operation::ManageWebhooks => role == Role::Admin,
    };
    Decision::from(allowed)
}

/// Run [`authorize`] and turn a denial into a forbidden error.
pub fn require(principal: &Principal, operation: Operation) -> Result<(), Error> {
    authorize(principal.role, operation)
        .or_forbidden(format!("your role may not {}", operation.describe()))
}

/// Which orders a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    OwnedBy(UserId),
    WithStatus(OrderStatus),
}

impl OrderScope {
    /// Scope for `principal`: vendors see their own orders, viewers only
    /// delivered ones, staff everything.
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Admin | Role::StaffCoordinator => OrderScope::All,
            Role::Vendor => OrderScope::OwnedBy(principal.id),
            Role::Viewer => OrderScope::WithStatus(OrderStatus::Delivered),
        }
    }

    /// Whether `order` falls inside this scope.
    pub fn admits(&self, order: &Order) -> bool {
        match self {
            OrderScope::All => true,
            OrderScope::OwnedBy(vendor) => order.vendor_id() == vendor,
            OrderScope::WithStatus(status) => order.status() == *status,
        }
    }
}

/// Admins may view any profile; everyone may view their own.
pub fn can_view_user(principal: &Principal, target: &UserId) -> Decision {
    Decision::from(principal.role == Role::Admin || principal.id == *target)
}
