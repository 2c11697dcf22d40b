pub mod auth;
pub mod config;
mod error;
pub mod helpers;
mod routes;
pub mod validation;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use error::ErrorBody;

pub struct AppState {
    pub db: stockline_db::Database,
    pub jwt_key: Option<String>,
}

/// Create the application router with the given database and configuration
pub fn create_app(
    db: stockline_db::Database,
    jwt_key: Option<String>,
    request_body_limit: usize,
    request_timeout: Duration,
) -> Router {
    let state = Arc::new(AppState { db, jwt_key });

    // Everything except login and health sits behind the auth gate.
    let protected = Router::new()
        .route("/user-list", get(routes::users::list_users))
        .route("/user-get/{id}", get(routes::users::get_user))
        .route("/user-delete/{id}", get(routes::users::delete_user))
        .route("/user-create", post(routes::users::create_user))
        .route("/user-update", post(routes::users::update_user))
        .route("/products-list", get(routes::products::list_products))
        .route("/product-get/{id}", get(routes::products::get_product))
        .route("/product-delete/{id}", get(routes::products::delete_product))
        .route("/product-create", post(routes::products::create_product))
        .route("/product-update", post(routes::products::update_product))
        .route(
            "/product-types-list",
            get(routes::product_types::list_product_types),
        )
        .route(
            "/product-type-create",
            post(routes::product_types::create_product_type),
        )
        .route(
            "/product-type-delete/{id}",
            get(routes::product_types::delete_product_type),
        )
        .route(
            "/transaction-list",
            get(routes::transactions::list_transactions),
        )
        .route("/transaction-purchase", post(routes::transactions::purchase))
        .route("/transaction-sale", post(routes::transactions::sale))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let open = Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/login", post(routes::login::login));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(open)
        .merge(protected)
        .fallback(route_not_found)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(RequestBodyLimitLayer::new(request_body_limit))
        .with_state(state)
}

async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Route not found!")),
    )
}
