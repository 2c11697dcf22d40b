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
use serde_json::json;
use std::sync::Arc;
use stockline_db::NewProductType;

const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", "Name", Some(FieldKind::Str)),
    FieldRule::required("tax", "Tax", Some(FieldKind::Numeric)),
];

pub(crate) async fn list_product_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let types = state.db.list_product_types().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": types })),
    ))
}

pub(crate) async fn create_product_type(
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

    let product_type = NewProductType {
        name: helpers::sanitize_text(helpers::str_field(&request, "name").unwrap_or_default()),
        tax: helpers::f64_field(&request, "tax").unwrap_or_default(),
    };

    let product_type_id = state.db.create_product_type(product_type, now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Product type created successfully.",
            "product_type_id": product_type_id,
        })),
    ))
}

pub(crate) async fn delete_product_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "A valid product type ID is required.".to_string(),
        ));
    }

    state.db.delete_product_type(id, now()).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Product type deleted successfully.",
        })),
    ))
}
