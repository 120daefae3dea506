//! Integration tests for API endpoints.
//!
//! The router runs against in-memory storage, so no database or Redis is
//! needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use finapi::api::{create_router, AppState};
use finapi::config::Config;

fn app() -> Router {
    let config = Config::new("test-secret-key-for-testing-only-32chars").unwrap();
    create_router(AppState::in_memory(config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register a user and open a session, returning the bearer token.
async fn sign_in(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "name": "Jean", "email": email, "password": "12344321" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, session) = send(
        app,
        Method::POST,
        "/api/v1/sessions",
        None,
        Some(json!({ "email": email, "password": "12344321" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    session["token"].as_str().unwrap().to_string()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_endpoint_returns_welcome_message() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Welcome to FinAPI");
}

#[tokio::test]
async fn test_health_reports_disabled_backends() {
    let (status, body) = send(&app(), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "disabled");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}

#[tokio::test]
async fn test_create_user_returns_profile_without_password() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "name": "Jean", "email": "jean@email.com.br", "password": "12344321" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "jean@email.com.br");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_twice_conflicts() {
    let app = app();
    sign_in(&app, "jean@email.com.br").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "name": "Jean", "email": "jean@email.com.br", "password": "12344321" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_user_validation() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "name": "Jean", "email": "not-an-email", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_session_with_wrong_password() {
    let app = app();
    sign_in(&app, "jean@email.com.br").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "jean@email.com.br", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

// =============================================================================
// Protected endpoints
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app();
    for uri in ["/api/v1/profile", "/api/v1/statements/balance"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some("not-a-token"),
        Some(json!({ "amount": 10, "description": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile() {
    let app = app();
    let token = sign_in(&app, "jean@email.com.br").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jean");
    assert_eq!(body["email"], "jean@email.com.br");
}

#[tokio::test]
async fn test_statement_flow() {
    let app = app();
    let token = sign_in(&app, "jean@email.com.br").await;

    let (status, deposit) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 100, "description": "pay" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["type"], "deposit");
    assert_eq!(deposit["amount"], 100.0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/statements/withdraw",
        Some(&token),
        Some(json!({ "amount": 90, "description": "rent" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/statements/withdraw",
        Some(&token),
        Some(json!({ "amount": 20, "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_FUNDS");

    let (status, balance) = send(
        &app,
        Method::GET,
        "/api/v1/statements/balance",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["balance"], 10.0);
    assert_eq!(balance["statement"].as_array().unwrap().len(), 2);

    let uri = format!("/api/v1/statements/{}", deposit["id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "pay");
    assert_eq!(fetched["user_id"], deposit["user_id"]);
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let app = app();
    let token = sign_in(&app, "jean@email.com.br").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 0, "description": "nothing" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn test_unrepresentable_amounts_rejected() {
    let app = app();
    let token = sign_in(&app, "jean@email.com.br").await;

    for (uri, amount) in [
        ("/api/v1/statements/deposit", json!(100000000000000000000.0)),
        ("/api/v1/statements/deposit", json!(10000000000000000.0)),
        ("/api/v1/statements/deposit", json!(0.00001)),
        ("/api/v1/statements/withdraw", json!(0.00005)),
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            uri,
            Some(&token),
            Some(json!({ "amount": amount, "description": "edge" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", amount);
        assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
    }

    let (status, balance) = send(
        &app,
        Method::GET,
        "/api/v1/statements/balance",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["balance"], 0.0);
    assert!(balance["statement"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_description_length_limit() {
    let app = app();
    let token = sign_in(&app, "jean@email.com.br").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 10, "description": "a".repeat(255) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 10, "description": "a".repeat(256) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_other_users_statement_is_not_found() {
    let app = app();
    let owner = sign_in(&app, "owner@email.com").await;
    let intruder = sign_in(&app, "intruder@email.com").await;

    let (_, deposit) = send(
        &app,
        Method::POST,
        "/api/v1/statements/deposit",
        Some(&owner),
        Some(json!({ "amount": 50, "description": "savings" })),
    )
    .await;
    let uri = format!("/api/v1/statements/{}", deposit["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "STATEMENT_NOT_FOUND");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(&app(), Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "FinAPI");
}
