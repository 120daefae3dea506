//! FinAPI - a personal finance ledger service.
//!
//! Users register, open sessions and record deposits and withdrawals. The
//! balance is never stored; it is derived from the statements on read.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, statements and the balance calculation
//! - **services**: Use cases (authentication, profile, statements)
//! - **infra**: PostgreSQL, in-memory storage, Redis, Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against PostgreSQL and Redis
//! cargo run -- serve
//!
//! # Start the server without external services
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Balance, NewStatement, OperationType, Password, Statement, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
