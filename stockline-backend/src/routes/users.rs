use crate::error::AppError;
use crate::helpers::{self, now};
use crate::validation::{check_fields, FieldKind, FieldRule};
use crate::AppState;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_macros::debug_handler;
use serde_json::json;
use std::sync::Arc;
use stockline_db::{NewUser, UserPatch};

const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", "Name", Some(FieldKind::Str)),
    FieldRule::required("email", "Email", Some(FieldKind::Email)),
    FieldRule::required("password", "Password", None),
];

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::optional("name", "Name", Some(FieldKind::Str)),
    FieldRule::optional("email", "Email", Some(FieldKind::Email)),
    FieldRule::optional("password", "Password", None),
];

pub(crate) async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.db.list_users().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": users })),
    ))
}

pub(crate) async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "A valid user ID is required. E.g.: /user-get/1".to_string(),
        ));
    }

    let user = state.db.get_user(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": user })),
    ))
}

#[debug_handler]
pub(crate) async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let errors = check_fields(&request, CREATE_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in the required field(s): {}",
            errors.join(", ")
        )));
    }

    let password = helpers::str_field(&request, "password")
        .unwrap_or_default()
        .trim();
    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|_| AppError::Internal("password hashing failed".to_string()))?;

    let user = NewUser {
        name: helpers::sanitize_text(helpers::str_field(&request, "name").unwrap_or_default()),
        email: helpers::sanitize_text(helpers::str_field(&request, "email").unwrap_or_default()),
        password: hashed,
    };

    let user_id = state.db.create_user(user, now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "User created successfully.",
            "user_id": user_id,
        })),
    ))
}

pub(crate) async fn update_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let Some(id) = helpers::i64_field(&request, "id").filter(|id| *id > 0) else {
        return Err(AppError::BadRequest(
            "The user ID is required for an update!".to_string(),
        ));
    };

    let errors = check_fields(&request, UPDATE_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in the required field(s): {}",
            errors.join(", ")
        )));
    }

    let mut patch = UserPatch {
        name: helpers::text_field(&request, "name").map(helpers::sanitize_text),
        email: helpers::text_field(&request, "email").map(helpers::sanitize_text),
        password: None,
    };
    if let Some(password) = helpers::text_field(&request, "password") {
        patch.password = Some(
            bcrypt::hash(password, bcrypt::DEFAULT_COST)
                .map_err(|_| AppError::Internal("password hashing failed".to_string()))?,
        );
    }

    state.db.update_user(id, patch, now()).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "User updated successfully.",
        })),
    ))
}

pub(crate) async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "A valid user ID is required.".to_string(),
        ));
    }

    state.db.delete_user(id, false, now()).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "User deleted successfully.",
        })),
    ))
}
