use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::models::{NewUser, User};
use crate::error::{AppError, DatabaseError};

/// Persistence contract for user records keyed by email.
///
/// Implementations own email uniqueness: `create` must fail with
/// `DatabaseError::Duplicate` when the email is already taken, atomically
/// with respect to concurrent `create` calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create(&self, user: NewUser) -> Result<User, AppError>;
}

/// Credential store held in process memory, keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        // Check and insert under one write lock.
        let mut users = self.users.write().await;

        if users.contains_key(&user.email) {
            return Err(DatabaseError::Duplicate.into());
        }

        let user = user.into_user();
        users.insert(user.email.clone(), user.clone());

        Ok(user)
    }
}
