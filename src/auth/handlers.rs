use actix_web::{web, HttpResponse, HttpRequest};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::auth::TokenPayload;
use crate::error::{AppError, AuthError};
use tracing::{info, warn};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub payload: TokenPayload,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::AuthError(AuthError::InvalidToken))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    if !is_valid_email(&req.email) {
        return Err(AppError::ValidationError("email address is not valid".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::ValidationError("password must not be empty".into()));
    }

    match state.auth_service.login(&req.email, &req.password).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            warn!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    if !is_valid_email(&req.email) {
        return Err(AppError::ValidationError("email address is not valid".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::ValidationError("password must not be empty".into()));
    }
    if req.username.trim().is_empty() {
        return Err(AppError::ValidationError("username must not be empty".into()));
    }

    match state
        .auth_service
        .register(&req.email, &req.password, req.username.trim())
        .await
    {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(e) => {
            warn!("Registration failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn verify(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let payload = state.auth_service.verify_token(token)?;

    Ok(HttpResponse::Ok().json(VerifyResponse {
        valid: true,
        payload,
    }))
}

/// Exchanges a valid session token for a long-lived one.
pub async fn issue_token(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let payload = state.auth_service.verify_token(token)?;
    let issued = state.auth_service.issue_long_lived_token(&payload)?;

    info!("Issued long-lived token for user {}", payload.user_id);

    Ok(HttpResponse::Ok().json(TokenResponse {
        token: issued.token,
        expires_at: issued.payload.expires_at,
    }))
}
