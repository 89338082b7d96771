use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::password::PasswordHasher;
use crate::auth::token::{IssuedToken, TokenPayload, TokenService, TokenSubject};
use crate::db::models::{NewUser, User};
use crate::db::store::CredentialStore;
use crate::error::{AppError, AuthError, DatabaseError};

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Login and registration over a credential store.
///
/// Every step is fail-fast: the first failing lookup, hash check or write
/// ends the operation with that error.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenService,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verify_password(password, &user.password_hash).await? {
            warn!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = self.tokens.issue(
            TokenSubject {
                user_id: user.id,
                email: user.email.clone(),
            },
            self.tokens.session_ttl(),
        )?;

        info!("User {} logged in", user.id);

        Ok(LoginResponse {
            token: issued.token,
            user,
        })
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, AppError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.hash_password(password).await?;

        let user = self
            .store
            .create(NewUser::new(
                email.to_string(),
                password_hash,
                username.to_string(),
            ))
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration for the same email.
                AppError::DatabaseError(DatabaseError::Duplicate) => {
                    AppError::AuthError(AuthError::UserAlreadyExists)
                }
                other => other,
            })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, AppError> {
        self.tokens.verify(token)
    }

    /// Issues a token with the long-lived lifetime for an already verified caller.
    pub fn issue_long_lived_token(&self, payload: &TokenPayload) -> Result<IssuedToken, AppError> {
        self.tokens.issue(
            TokenSubject {
                user_id: payload.user_id,
                email: payload.email.clone(),
            },
            self.tokens.long_lived_ttl(),
        )
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await?)
    }
}
