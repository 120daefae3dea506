//! Statement handlers: balance, single statement, deposit and withdraw.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{BalanceResponse, NewStatement, OperationType, StatementResponse};
use crate::errors::AppResult;

/// Deposit or withdraw request. The operation type comes from the path.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatementRequest {
    /// Positive amount below 10^16 with at most four decimal places
    #[schema(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    /// Free text
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    #[schema(example = "Salary")]
    pub description: String,
}

/// Statement routes, mounted under `/statements`
pub fn statement_routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_balance))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/:statement_id", get(get_statement))
}

/// All statements of the authenticated user and the current balance
#[utoipa::path(
    get,
    path = "/api/v1/statements/balance",
    tag = "Statements",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statements and balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<BalanceResponse>> {
    let balance = state.statement_service.get_balance(current_user.id).await?;
    Ok(Json(BalanceResponse::from(balance)))
}

/// One statement of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/statements/{statement_id}",
    tag = "Statements",
    security(("bearer_auth" = [])),
    params(
        ("statement_id" = Uuid, Path, description = "Statement ID")
    ),
    responses(
        (status = 200, description = "Statement", body = StatementResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or statement not found")
    )
)]
pub async fn get_statement(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(statement_id): Path<Uuid>,
) -> AppResult<Json<StatementResponse>> {
    let statement = state
        .statement_service
        .get_statement(current_user.id, statement_id)
        .await?;

    Ok(Json(StatementResponse::from(statement)))
}

/// Record a deposit
#[utoipa::path(
    post,
    path = "/api/v1/statements/deposit",
    tag = "Statements",
    security(("bearer_auth" = [])),
    request_body = StatementRequest,
    responses(
        (status = 201, description = "Deposit recorded", body = StatementResponse),
        (status = 400, description = "Invalid amount or description"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StatementRequest>,
) -> AppResult<(StatusCode, Json<StatementResponse>)> {
    create(state, current_user, OperationType::Deposit, payload).await
}

/// Record a withdrawal
#[utoipa::path(
    post,
    path = "/api/v1/statements/withdraw",
    tag = "Statements",
    security(("bearer_auth" = [])),
    request_body = StatementRequest,
    responses(
        (status = 201, description = "Withdrawal recorded", body = StatementResponse),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StatementRequest>,
) -> AppResult<(StatusCode, Json<StatementResponse>)> {
    create(state, current_user, OperationType::Withdraw, payload).await
}

async fn create(
    state: AppState,
    current_user: CurrentUser,
    kind: OperationType,
    payload: StatementRequest,
) -> AppResult<(StatusCode, Json<StatementResponse>)> {
    let statement = state
        .statement_service
        .create_statement(NewStatement {
            user_id: current_user.id,
            kind,
            amount: payload.amount,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(StatementResponse::from(statement))))
}
