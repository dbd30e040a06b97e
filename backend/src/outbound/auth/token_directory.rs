//! Bearer-token directory implementing the `Authenticator` port.
//!
//! Tokens are registered out of band (at start-up or by tests) and map to a
//! user id. The role is read from the user repository on every request so a
//! role change or account deletion takes effect immediately.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    AuthenticationError, Authenticator, UserPersistenceError, UserRepository,
};
use crate::domain::{Principal, UserId};

/// Token-to-user map backed by a user repository.
pub struct TokenDirectory<R> {
    tokens: RwLock<HashMap<String, UserId>>,
    users: Arc<R>,
}

impl<R> TokenDirectory<R> {
    /// Create an empty directory resolving principals through `users`.
    pub fn new(users: Arc<R>) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            users,
        }
    }

    /// Associate `token` with `user_id`, replacing any previous owner.
    pub async fn register(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.write().await.insert(token.into(), user_id);
    }

    /// Forget `token`; later requests carrying it are unauthenticated.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

fn map_repository_error(error: UserPersistenceError) -> AuthenticationError {
    AuthenticationError::unavailable(error.to_string())
}

#[async_trait]
impl<R> Authenticator for TokenDirectory<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, token: &str) -> Result<Option<Principal>, AuthenticationError> {
        let Some(user_id) = self.tokens.read().await.get(token).copied() else {
            debug!("unknown bearer token");
            return Ok(None);
        };
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(user.map(|user| Principal::new(*user.id(), user.role())))
    }
}
