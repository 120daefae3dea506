//! Infrastructure layer - External systems integration
//!
//! - Postgres connection, migrations and repositories (SeaORM)
//! - In-memory repositories for running without a database
//! - Redis cache for user profiles and rate limiting
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    InMemoryStatementStore, InMemoryUserStore, StatementRepository, StatementStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{
    MemoryPersistence, Persistence, TransactionContext, TxFuture, TxStatementRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockStatementRepository, MockUserRepository};
