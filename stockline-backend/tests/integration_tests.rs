use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use stockline_backend::{auth, create_app, helpers};
use tower::ServiceExt;
// for `oneshot` method

const TEST_SECRET: &str = "test-secret";

/// Helper to create test database with in-memory SQLite
async fn setup_test_db() -> stockline_db::Database {
    stockline_db::Database::open_in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Helper to create app with default test configuration
fn create_test_app(db: stockline_db::Database) -> axum::Router {
    create_app(
        db,
        Some(TEST_SECRET.to_string()),
        1024 * 1024,
        Duration::from_secs(30),
    )
}

/// Mint a valid bearer token without going through /login
fn mint_token() -> String {
    auth::issue_token("tester@test.com", TEST_SECRET, helpers::now()).unwrap()
}

/// Helper to send a request and get response
async fn send_request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut request_builder = Request::builder().uri(uri).method(method);

    // Add Authorization header if provided
    if let Some(token) = auth_token {
        request_builder = request_builder.header("Authorization", format!("Bearer {}", token));
    }

    // Build request with body
    let request = if let Some(json_body) = body {
        request_builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json_body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    // Send request
    let response = app.oneshot(request).await.unwrap();

    // Extract status
    let status = response.status();

    // Extract body
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    // Try to parse as JSON, or return empty object
    let json = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

/// Create a user through the API and return its id
async fn seed_user(db: &stockline_db::Database, name: &str, email: &str, password: &str) -> i64 {
    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/user-create",
        Some(json!({ "name": name, "email": email, "password": password })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["user_id"].as_i64().unwrap()
}

/// Create a product type and a product, returning the product id
async fn seed_product(db: &stockline_db::Database) -> i64 {
    let token = mint_token();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/product-type-create",
        Some(json!({ "name": "Beverages", "tax": 0.1 })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let type_id = body["product_type_id"].as_i64().unwrap();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/product-create",
        Some(json!({
            "name": "Coffee",
            "description": "Ground coffee, 500g",
            "product_type_id": type_id,
            "value": 55.0,
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["product_id"].as_i64().unwrap()
}

// =============================================================================
// ROUTING TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, _body) = send_request(app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_enveloped_404() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(app, "GET", "/no-such-route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Route not found!");
}

#[tokio::test]
async fn test_wrong_method_returns_405() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, _body) = send_request(app, "GET", "/login", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// AUTH GATE TESTS
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_token() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(app, "GET", "/user-list", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Token not found!");
}

#[tokio::test]
async fn test_rejected_request_never_reaches_the_handler() {
    let db = setup_test_db().await;
    let app = create_test_app(db.clone());

    let (status, _body) = send_request(
        app,
        "POST",
        "/product-type-create",
        Some(json!({ "name": "Sneaky", "tax": 0.1 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No row was written
    assert!(matches!(
        db.list_product_types().await,
        Err(stockline_db::DbError::EmptyList(_))
    ));
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) =
        send_request(app, "GET", "/user-list", None, Some("definitely-not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token!");
}

#[tokio::test]
async fn test_wrong_signature_rejected() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let forged = auth::issue_token("tester@test.com", "other-secret", helpers::now()).unwrap();
    let (status, body) = send_request(app, "GET", "/user-list", None, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token signature!");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    // Issued two hours ago, expired one hour ago
    let expired = auth::issue_token("tester@test.com", TEST_SECRET, helpers::now() - 7200).unwrap();
    let (status, body) = send_request(app, "GET", "/user-list", None, Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired!");
}

#[tokio::test]
async fn test_unconfigured_secret_rejects_tokens_as_unverifiable() {
    let db = setup_test_db().await;
    let app = create_app(db, None, 1024 * 1024, Duration::from_secs(30));

    let (status, body) = send_request(app, "GET", "/user-list", None, Some(&mint_token())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token!");
}

#[tokio::test]
async fn test_unconfigured_secret_fails_login_server_side() {
    let db = setup_test_db().await;
    db.create_user(
        stockline_db::NewUser {
            name: "Jhon Cash".to_string(),
            email: "jhon@test.com".to_string(),
            password: bcrypt::hash("secret", 4).unwrap(),
        },
        helpers::now(),
    )
    .await
    .unwrap();

    let app = create_app(db, None, 1024 * 1024, Duration::from_secs(30));
    let (status, body) = send_request(
        app,
        "POST",
        "/login",
        Some(json!({ "email": "jhon@test.com", "password": "secret" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
}

// =============================================================================
// LOGIN TESTS
// =============================================================================

#[tokio::test]
async fn test_login_unknown_user() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/login",
        Some(json!({ "email": "ghost@test.com", "password": "whatever" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Incorrect E-mail or Password.");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let db = setup_test_db().await;
    seed_user(&db, "Jhon Cash", "jhon@test.com", "secret").await;

    let app = create_test_app(db);
    let (status, body) = send_request(
        app,
        "POST",
        "/login",
        Some(json!({ "email": "jhon@test.com", "password": "not-secret" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Incorrect E-mail or Password.");
}

#[tokio::test]
async fn test_login_validation_errors() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/login",
        Some(json!({ "email": "not-an-email" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("must be a valid email address"));
    assert!(message.contains("Password is required."));
}

#[tokio::test]
async fn test_login_accepts_form_encoded_body() {
    let db = setup_test_db().await;
    seed_user(&db, "Jhon Cash", "jhon@test.com", "secret").await;

    let app = create_test_app(db);
    let request = Request::builder()
        .uri("/login")
        .method("POST")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from("email=jhon%40test.com&password=secret"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["status"], "success");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

// =============================================================================
// USER SCENARIO TESTS
// =============================================================================

#[tokio::test]
async fn test_full_user_scenario() {
    let db = setup_test_db().await;
    let user_id = seed_user(&db, "Jhon Cash", "emailtest@test.com", "secret").await;

    // Login with the created credentials
    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/login",
        Some(json!({ "email": "emailtest@test.com", "password": "secret" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["name"], "Jhon Cash");
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // Fetch the user with the issued token
    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "GET",
        &format!("/user-get/{user_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Jhon Cash");
    assert_eq!(body["data"]["email"], "emailtest@test.com");
    // The password hash must not appear in API responses
    assert!(body["data"].get("password").is_none());

    // Soft-delete it
    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "GET",
        &format!("/user-delete/{user_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    // It is gone now
    let app = create_test_app(db);
    let (status, body) = send_request(
        app,
        "GET",
        &format!("/user-get/{user_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_user_create_validation() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/user-create",
        Some(json!({ "email": "not-an-email", "password": "x" })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Name is required."));
    assert!(message.contains("The Email must be a valid email address."));
}

#[tokio::test]
async fn test_user_partial_update() {
    let db = setup_test_db().await;
    let user_id = seed_user(&db, "Jhon Cash", "jhon@test.com", "secret").await;
    let token = mint_token();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/user-update",
        Some(json!({ "id": user_id, "name": "John Doe Updated" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    // Unspecified columns are untouched
    let app = create_test_app(db);
    let (_status, body) = send_request(
        app,
        "GET",
        &format!("/user-get/{user_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(body["data"]["name"], "John Doe Updated");
    assert_eq!(body["data"]["email"], "jhon@test.com");
}

#[tokio::test]
async fn test_user_update_without_id() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/user-update",
        Some(json!({ "name": "No Id" })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The user ID is required for an update!");
}

#[tokio::test]
async fn test_user_get_with_invalid_id() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(app, "GET", "/user-get/0", None, Some(&mint_token())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

// =============================================================================
// PRODUCT SCENARIO TESTS
// =============================================================================

#[tokio::test]
async fn test_full_product_scenario() {
    let db = setup_test_db().await;
    let product_id = seed_product(&db).await;
    let token = mint_token();

    // Listing joins the type
    let app = create_test_app(db.clone());
    let (status, body) = send_request(app, "GET", "/products-list", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Coffee");
    assert_eq!(rows[0]["product_type_name"], "Beverages");
    assert_eq!(rows[0]["tax"], 0.1);

    // Partial update leaves the description untouched
    let app = create_test_app(db.clone());
    let (status, _body) = send_request(
        app,
        "POST",
        "/product-update",
        Some(json!({ "id": product_id, "value": 60.0 })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "GET",
        &format!("/product-get/{product_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], 60.0);
    assert_eq!(body["data"]["description"], "Ground coffee, 500g");

    // Soft-delete excludes it from get and list
    let app = create_test_app(db.clone());
    let (status, _body) = send_request(
        app,
        "GET",
        &format!("/product-delete/{product_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = create_test_app(db.clone());
    let (status, _body) = send_request(
        app,
        "GET",
        &format!("/product-get/{product_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = create_test_app(db);
    let (status, _body) = send_request(app, "GET", "/products-list", None, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_update_without_id() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/product-update",
        Some(json!({ "value": 60.0 })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The product ID is required for an update!");
}

#[tokio::test]
async fn test_product_requires_existing_type() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/product-create",
        Some(json!({
            "name": "Orphan",
            "description": "No type",
            "product_type_id": 999,
            "value": 1.0,
        })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_product_type_delete_then_list() {
    let db = setup_test_db().await;
    let token = mint_token();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/product-type-create",
        Some(json!({ "name": "Ephemeral", "tax": 0.05 })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let type_id = body["product_type_id"].as_i64().unwrap();

    let app = create_test_app(db.clone());
    let (status, _body) = send_request(
        app,
        "GET",
        &format!("/product-type-delete/{type_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = create_test_app(db);
    let (status, _body) = send_request(app, "GET", "/product-types-list", None, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// TRANSACTION SCENARIO TESTS
// =============================================================================

#[tokio::test]
async fn test_purchase_transaction_scenario() {
    let db = setup_test_db().await;
    let product_id = seed_product(&db).await;
    let token = mint_token();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/transaction-purchase",
        Some(json!({
            "supplier_name": "Acme",
            "value_without_tax": 100,
            "total_tax": 10,
            "product_id": product_id,
            "amount": 2,
            "total_value": 110,
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["transaction_id"].as_i64().unwrap() > 0);

    let app = create_test_app(db);
    let (status, body) = send_request(app, "GET", "/transaction-list", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["transaction_type"], "Purchase");
    assert_eq!(rows[0]["supplier_name"], "Acme");
    assert_eq!(rows[0]["product_name"], "Coffee");
    assert_eq!(rows[0]["total_value"], 110.0);
}

#[tokio::test]
async fn test_sale_transaction() {
    let db = setup_test_db().await;
    let product_id = seed_product(&db).await;
    let token = mint_token();

    let app = create_test_app(db.clone());
    let (status, body) = send_request(
        app,
        "POST",
        "/transaction-sale",
        Some(json!({
            "customer_name": "Maria",
            "product_id": product_id,
            "amount": 1,
            "total_value": 60.5,
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["transaction_id"].as_i64().unwrap() > 0);

    let app = create_test_app(db);
    let (status, body) = send_request(app, "GET", "/transaction-list", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows[0]["transaction_type"], "Sale");
    assert_eq!(rows[0]["customer_name"], "Maria");
    // Purchase-only columns are omitted from sale rows
    assert!(rows[0].get("supplier_name").is_none());
    assert!(rows[0].get("value_without_tax").is_none());
}

#[tokio::test]
async fn test_purchase_validation() {
    let db = setup_test_db().await;
    let app = create_test_app(db);

    let (status, body) = send_request(
        app,
        "POST",
        "/transaction-purchase",
        Some(json!({ "amount": 2 })),
        Some(&mint_token()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Supplier name is required."));
    assert!(message.contains("Total value is required."));
}
