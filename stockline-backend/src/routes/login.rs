use crate::auth::{self, AuthError};
use crate::error::AppError;
use crate::helpers::{self, now};
use crate::validation::{check_fields, FieldKind, FieldRule};
use crate::AppState;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_macros::debug_handler;
use serde_json::json;
use std::sync::Arc;

const LOGIN_RULES: &[FieldRule] = &[
    FieldRule::required("email", "E-mail", Some(FieldKind::Email)),
    FieldRule::required("password", "Password", None),
];

#[debug_handler]
pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let errors = check_fields(&request, LOGIN_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(" ")));
    }

    let email = helpers::text_field(&request, "email").unwrap_or_default();
    let password = helpers::str_field(&request, "password").unwrap_or_default();

    let user = state
        .db
        .get_auth_user_by_email(email.to_string())
        .await?
        .ok_or(AuthError::BadCredentials)?;

    if !bcrypt::verify(password, &user.password).unwrap_or(false) {
        return Err(AuthError::BadCredentials.into());
    }

    let secret = state.jwt_key.as_deref().ok_or(AuthError::SecretMissing)?;
    let token = auth::issue_token(email, secret, now())?;

    tracing::debug!(%email, "login succeeded");
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "token": token,
            "name": user.name,
        })),
    ))
}
