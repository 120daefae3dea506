//! Registration and session handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::SessionResponse;

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jean Alves")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jean@email.com.br")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "12344321", min_length = 8)]
    pub password: String,
}

/// Session creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SessionRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jean@email.com.br")]
    pub email: String,
    /// User password
    #[schema(example = "12344321")]
    pub password: String,
}

/// Public routes: user creation and sessions
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/sessions", post(create_session))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Authenticate and get a JWT token
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Authenticated", body = SessionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SessionRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .auth_service
        .authenticate(payload.email, payload.password)
        .await?;

    Ok(Json(session))
}
