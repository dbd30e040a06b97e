//! Driving port for account administration.

use async_trait::async_trait;

use crate::domain::{Error, Principal, User, UserDraft, UserId, UserPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account. Admin only; a taken email is a conflict.
    async fn create_user(&self, principal: &Principal, draft: UserDraft) -> Result<User, Error>;

    /// Edit an account. Admin only; moving to a taken email is a conflict.
    async fn update_user(
        &self,
        principal: &Principal,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<User, Error>;

    /// Delete an account. Admin only, and never the caller's own.
    async fn delete_user(&self, principal: &Principal, id: &UserId) -> Result<(), Error>;
}
