//! In-memory `UserRepository` adapter with a unique email index.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserId};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    by_email: HashMap<Email, UserId>,
}

impl Tables {
    fn email_taken_by_other(&self, email: &Email, owner: &UserId) -> bool {
        self.by_email
            .get(email)
            .is_some_and(|holder| holder != owner)
    }
}

/// Process-local user store.
#[derive(Default)]
pub struct MemoryUserRepository {
    tables: RwLock<Tables>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken_by_other(user.email(), user.id()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        if tables.users.contains_key(user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id()
            )));
        }
        tables.by_email.insert(user.email().clone(), *user.id());
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken_by_other(user.email(), user.id()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        let Some(stored) = tables.users.get_mut(user.id()) else {
            return Err(UserPersistenceError::missing(user.id().to_string()));
        };
        let previous = std::mem::replace(stored, user.clone());
        tables.by_email.remove(previous.email());
        tables.by_email.insert(user.email().clone(), *user.id());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.tables.write().await;
        match tables.users.remove(id) {
            Some(user) => {
                tables.by_email.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(users)
    }
}
