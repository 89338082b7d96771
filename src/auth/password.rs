use std::fmt::Debug;

use crate::error::AppError;

/// Work factor for new password hashes.
pub const PASSWORD_COST: u32 = 10;

pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// A mismatch, or a hash this scheme cannot parse, is `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Salted bcrypt hashing. Verification compares digests in constant time.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: PASSWORD_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
