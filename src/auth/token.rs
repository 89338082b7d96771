use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, AuthError};

/// Signing key and the two lifetimes callers choose between.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub session_ttl: Duration,
    pub long_lived_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            session_ttl: Duration::hours(24),
            long_lived_ttl: Duration::days(7),
        }
    }
}

impl TryFrom<&AuthConfig> for TokenConfig {
    type Error = AppError;

    fn try_from(config: &AuthConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl()?,
            long_lived_ttl: config.long_lived_ttl()?,
        })
    }
}

/// Who a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
}

/// Everything a token asserts. Timestamps have whole-second precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: Uuid,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub payload: TokenPayload,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,  // User ID
    email: String,
    iat: i64,     // Issued at
    exp: i64,     // Expiration time
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
    long_lived_ttl: Duration,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` with a strict `now < exp` and no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            session_ttl: config.session_ttl,
            long_lived_ttl: config.long_lived_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn long_lived_ttl(&self) -> Duration {
        self.long_lived_ttl
    }

    pub fn issue(&self, subject: TokenSubject, ttl: Duration) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: TokenSubject,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AppError::ValidationError(format!("token lifetime {} is out of range", ttl))
        })?;
        let iat = now.timestamp();
        let exp = expires_at.timestamp();

        let claims = Claims {
            sub: subject.user_id.to_string(),
            email: subject.email,
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))?;

        debug!("Issued token for user {} expiring at {}", claims.sub, exp);

        Ok(IssuedToken {
            token,
            payload: claims.into_payload()?,
        })
    }

    pub fn verify(&self, token: &str) -> Result<TokenPayload, AppError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenPayload, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if now.timestamp() >= claims.exp {
            debug!("Rejected expired token for user {}", claims.sub);
            return Err(AuthError::InvalidToken.into());
        }

        claims.into_payload()
    }
}

impl Claims {
    fn into_payload(self) -> Result<TokenPayload, AppError> {
        let invalid = || AppError::AuthError(AuthError::InvalidToken);

        Ok(TokenPayload {
            user_id: Uuid::parse_str(&self.sub).map_err(|_| invalid())?,
            email: self.email,
            issued_at: Utc.timestamp_opt(self.iat, 0).single().ok_or_else(invalid)?,
            expires_at: Utc.timestamp_opt(self.exp, 0).single().ok_or_else(invalid)?,
        })
    }
}
