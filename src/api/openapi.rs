//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, statement_handler, user_handler};
use crate::domain::{BalanceResponse, OperationType, StatementResponse, UserResponse};
use crate::services::SessionResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FinAPI",
        version = "0.1.0",
        description = "Personal finance ledger: deposits, withdrawals and a derived balance"
    ),
    servers(
        (url = "http://localhost:3333", description = "Local development server")
    ),
    paths(
        auth_handler::create_user,
        auth_handler::create_session,
        user_handler::get_profile,
        statement_handler::get_balance,
        statement_handler::get_statement,
        statement_handler::deposit,
        statement_handler::withdraw,
    ),
    components(
        schemas(
            UserResponse,
            OperationType,
            StatementResponse,
            BalanceResponse,
            SessionResponse,
            auth_handler::CreateUserRequest,
            auth_handler::SessionRequest,
            statement_handler::StatementRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "User creation and profile"),
        (name = "Sessions", description = "Authentication"),
        (name = "Statements", description = "Deposits, withdrawals and balance")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from POST /api/v1/sessions"))
                        .build(),
                ),
            );
        }
    }
}
