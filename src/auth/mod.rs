//! Authentication module for the profile dashboard backend
//!
//! Password hashing, session token issuance/verification, and the
//! login/register operations built on top of them.

pub mod handlers;
mod password;
mod service;
mod token;

pub use password::{BcryptHasher, PasswordHasher, PASSWORD_COST};
pub use service::{AuthService, LoginResponse};
pub use token::{IssuedToken, TokenConfig, TokenPayload, TokenService, TokenSubject};
