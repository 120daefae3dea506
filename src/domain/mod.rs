//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure balance calculation. Nothing in
//! here touches storage or HTTP.

pub mod password;
pub mod statement;
pub mod user;

pub use password::Password;
pub use statement::{
    balance_of, Balance, BalanceResponse, NewStatement, OperationType, Statement,
    StatementResponse,
};
pub use user::{NewUser, User, UserResponse};
