//! Repository layer - Data access abstraction
//!
//! Each repository is a trait with a SeaORM store for Postgres and an
//! in-memory store for local runs and tests.

pub(crate) mod entities;
mod memory;
pub(crate) mod statement_repository;
pub(crate) mod user_repository;

pub use memory::{InMemoryStatementStore, InMemoryUserStore};
pub use statement_repository::{StatementRepository, StatementStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use statement_repository::MockStatementRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
