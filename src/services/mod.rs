//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure. Each is a trait
//! with one implementation generic over `UnitOfWork`.

mod auth_service;
pub mod container;
mod statement_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, SessionResponse};
pub use statement_service::{StatementManager, StatementService};
pub use user_service::{UserManager, UserService};
