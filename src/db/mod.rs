//! Credential storage for the auth core.
//!
//! The core only talks to `CredentialStore`; the in-memory and Postgres
//! implementations both enforce email uniqueness on `create`.

pub mod models;
pub mod postgres;
pub mod store;

pub use models::{NewUser, User, UserRole};
pub use postgres::PgCredentialStore;
pub use store::{CredentialStore, InMemoryCredentialStore};
