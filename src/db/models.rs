use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A user record as handed to the credential store; the store assigns nothing
/// beyond what is here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub role: UserRole,
}

impl NewUser {
    pub fn new(email: String, password_hash: String, username: String) -> Self {
        Self {
            email,
            password_hash,
            username,
            role: UserRole::default(),
        }
    }

    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash: self.password_hash,
            username: self.username,
            role: self.role,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = NewUser::new(
            "a@b.com".to_string(),
            "$2b$10$secret".to_string(),
            "alice".to_string(),
        )
        .into_user();

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_admin_check_is_role_equality() {
        let mut new_user = NewUser::new(
            "admin@example.com".to_string(),
            "hash".to_string(),
            "root".to_string(),
        );
        assert!(!new_user.clone().into_user().is_admin());

        new_user.role = UserRole::Admin;
        assert!(new_user.into_user().is_admin());
    }

    #[test]
    fn test_role_parses_stored_names() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(UserRole::User.as_str().parse::<UserRole>(), Ok(UserRole::User));
        assert!("superuser".parse::<UserRole>().is_err());
    }
}
