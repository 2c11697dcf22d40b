use crate::error::AppError;
use crate::helpers::{self, now};
use crate::validation::{check_fields, FieldKind, FieldRule};
use crate::AppState;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use stockline_db::{NewPurchase, NewSale};

const PURCHASE_RULES: &[FieldRule] = &[
    FieldRule::required("supplier_name", "Supplier name", Some(FieldKind::Str)),
    FieldRule::required("value_without_tax", "Value without tax", Some(FieldKind::Numeric)),
    FieldRule::required("total_tax", "Total tax", Some(FieldKind::Numeric)),
    FieldRule::required("product_id", "Product ID", Some(FieldKind::Int)),
    FieldRule::required("amount", "Amount", Some(FieldKind::Int)),
    FieldRule::required("total_value", "Total value", Some(FieldKind::Numeric)),
];

const SALE_RULES: &[FieldRule] = &[
    FieldRule::required("customer_name", "Customer name", Some(FieldKind::Str)),
    FieldRule::required("product_id", "Product ID", Some(FieldKind::Int)),
    FieldRule::required("amount", "Amount", Some(FieldKind::Int)),
    FieldRule::required("total_value", "Total value", Some(FieldKind::Numeric)),
];

pub(crate) async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = state.db.list_transactions().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "data": transactions })),
    ))
}

pub(crate) async fn purchase(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let errors = check_fields(&request, PURCHASE_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in the required field(s): {}",
            errors.join(", ")
        )));
    }

    let purchase = NewPurchase {
        supplier_name: helpers::sanitize_text(
            helpers::str_field(&request, "supplier_name").unwrap_or_default(),
        ),
        value_without_tax: helpers::f64_field(&request, "value_without_tax").unwrap_or_default(),
        total_tax: helpers::f64_field(&request, "total_tax").unwrap_or_default(),
        product_id: helpers::i64_field(&request, "product_id").unwrap_or_default(),
        amount: helpers::i64_field(&request, "amount").unwrap_or_default(),
        total_value: helpers::f64_field(&request, "total_value").unwrap_or_default(),
    };

    let transaction_id = state.db.create_purchase(purchase, now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Transaction successfully inserted.",
            "transaction_id": transaction_id,
        })),
    ))
}

pub(crate) async fn sale(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = helpers::parse_body(&body);

    let errors = check_fields(&request, SALE_RULES);
    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in the required field(s): {}",
            errors.join(", ")
        )));
    }

    let sale = NewSale {
        customer_name: helpers::sanitize_text(
            helpers::str_field(&request, "customer_name").unwrap_or_default(),
        ),
        product_id: helpers::i64_field(&request, "product_id").unwrap_or_default(),
        amount: helpers::i64_field(&request, "amount").unwrap_or_default(),
        total_value: helpers::f64_field(&request, "total_value").unwrap_or_default(),
    };

    let transaction_id = state.db.create_sale(sale, now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Transaction successfully inserted.",
            "transaction_id": transaction_id,
        })),
    ))
}
