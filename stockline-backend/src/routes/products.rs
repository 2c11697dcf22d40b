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
use stockline_db::{NewProduct, ProductPatch};

const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", "Name", Some(FieldKind::Str)),
    FieldRule::required("description", "Description", Some(FieldKind::Str)),
    FieldRule::required("product_type_id", "Product Type", Some(FieldKind::Numeric)),
    FieldRule::required("value", "Value", Some(FieldKind::Numeric)),
];

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::optional("name", "Name", Some(FieldKind::Str)),
    FieldRule::optional("description", "Description", Some(FieldKind::Str)),
    FieldRule::optional("product_type_id", "Product Type", Some(FieldKind::Numeric)),
    FieldRule::optional("value", "Value", Some(FieldKind::Numeric)),
];

pub(crate) async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.db.list_products().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": products })),
    ))
}

pub(crate) async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "A valid product ID is required. E.g.: /product-get/1".to_string(),
        ));
    }

    let product = state.db.get_product(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": product })),
    ))
}

pub(crate) async fn create_product(
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

    let product = NewProduct {
        name: helpers::sanitize_text(helpers::str_field(&request, "name").unwrap_or_default()),
        description: helpers::sanitize_text(
            helpers::str_field(&request, "description").unwrap_or_default(),
        ),
        product_type_id: helpers::i64_field(&request, "product_type_id").unwrap_or_default(),
        value: helpers::f64_field(&request, "value").unwrap_or_default(),
    };

    let product_id = state.db.create_product(product, now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Product created successfully.",
            "product_id": product_id,
        })),
    ))
}

pub(crate) async fn update_product(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let Some(id) = helpers::i64_field(&request, "id").filter(|id| *id > 0) else {
        return Err(AppError::BadRequest(
            "The product ID is required for an update!".to_string(),
        ));
    };

    let errors = check_fields(&request, UPDATE_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in the required field(s): {}",
            errors.join(", ")
        )));
    }

    let patch = ProductPatch {
        name: helpers::text_field(&request, "name").map(helpers::sanitize_text),
        description: helpers::text_field(&request, "description").map(helpers::sanitize_text),
        product_type_id: helpers::i64_field(&request, "product_type_id"),
        value: helpers::f64_field(&request, "value"),
    };

    state.db.update_product(id, patch, now()).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Product updated successfully.",
        })),
    ))
}

pub(crate) async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "A valid product ID is required. E.g.: /product-delete/1".to_string(),
        ));
    }

    state.db.delete_product(id, now()).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Product deleted successfully.",
        })),
    ))
}
