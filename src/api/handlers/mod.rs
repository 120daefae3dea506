//! HTTP request handlers.

pub mod auth_handler;
pub mod statement_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use statement_handler::statement_routes;
pub use user_handler::user_routes;
