//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch profiles without
//! importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Principal, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account. Admin only.
    async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, Error>;

    /// One account: admins see anyone, others only themselves.
    async fn get_user(&self, principal: &Principal, id: &UserId) -> Result<User, Error>;

    /// The caller's own profile.
    async fn current_user(&self, principal: &Principal) -> Result<User, Error>;
}
