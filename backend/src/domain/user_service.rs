//! User administration and profile lookups.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    Email, Error, Operation, Principal, User, UserDraft, UserId, UserPatch, can_view_user,
    require,
};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
        UserPersistenceError::Missing { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    /// Wire the service to its user repository.
    pub fn new(users: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn ensure_email_free(&self, email: &Email, owner: Option<&UserId>) -> Result<(), Error> {
        let holder = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?;
        match holder {
            Some(existing) if Some(existing.id()) != owner => Err(Error::conflict(format!(
                "email {email} is already registered"
            ))),
            _ => Ok(()),
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, principal: &Principal, draft: UserDraft) -> Result<User, Error> {
        require(principal, Operation::ManageUsers)?;
        self.ensure_email_free(&draft.email, None).await?;

        let user = User::new(
            UserId::random(),
            draft.name,
            draft.email,
            draft.role,
            self.clock.utc(),
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), role = %user.role(), "user created");
        Ok(user)
    }

    async fn update_user(
        &self,
        principal: &Principal,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        require(principal, Operation::ManageUsers)?;
        let mut user = self.load(id).await?;
        if let Some(email) = &patch.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        user.apply(patch);
        self.users
            .update(&user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, principal: &Principal, id: &UserId) -> Result<(), Error> {
        require(principal, Operation::ManageUsers)?;
        if *id == principal.id {
            return Err(Error::invalid_request("you cannot delete your own account"));
        }
        let removed = self.users.delete(id).await.map_err(map_repository_error)?;
        if !removed {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, Error> {
        require(principal, Operation::ManageUsers)?;
        self.users.list().await.map_err(map_repository_error)
    }

    async fn get_user(&self, principal: &Principal, id: &UserId) -> Result<User, Error> {
        let user = self.load(id).await?;
        can_view_user(principal, id).or_forbidden("you may only view your own profile")?;
        Ok(user)
    }

    async fn current_user(&self, principal: &Principal) -> Result<User, Error> {
        require(principal, Operation::ViewOwnProfile)?;
        // A valid token for a deleted account resolves to nothing useful.
        self.users
            .find_by_id(&principal.id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
