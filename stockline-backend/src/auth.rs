use crate::error::AppError;
use crate::AppState;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Tokens expire one hour after issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Token not found!")]
    MissingToken,

    #[error("Token expired!")]
    Expired,

    #[error("Invalid token signature!")]
    InvalidSignature,

    #[error("Invalid token!")]
    Malformed,

    #[error("Incorrect E-mail or Password.")]
    BadCredentials,

    #[error("token signing secret is not configured")]
    SecretMissing,

    #[error("failed to sign token")]
    Signing,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    pub iat: i64,
    pub email: String,
}

/// Issue an HS256 token for the given email, valid for one hour from `now`.
pub fn issue_token(email: &str, secret: &str, now: i64) -> Result<String, AuthError> {
    let claims = Claims {
        exp: now + TOKEN_TTL_SECS,
        iat: now,
        email: email.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Signing)
}

/// Verify signature and expiry, returning the claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })
}

/// Auth gate for protected routes: verifies the bearer token before the
/// handler runs, otherwise responds 401 without invoking it.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    // Without a configured secret no token can verify, so the gate answers
    // as it would for any unverifiable token.
    let secret = state.jwt_key.as_deref().ok_or(AuthError::Malformed)?;
    verify_token(token, secret)?;

    Ok(next.run(request).await)
}
