//! Profile handler.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// Authenticated user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Show the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(cache) = &state.cache {
        match cache.get_user(&current_user.id).await {
            Ok(Some(profile)) => return Ok(Json(profile)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Profile cache read failed"),
        }
    }

    let profile = UserResponse::from(state.user_service.get_profile(current_user.id).await?);

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set_user(&profile).await {
            tracing::warn!(error = %e, "Profile cache write failed");
        }
    }

    Ok(Json(profile))
}
