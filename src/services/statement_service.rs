//! Statement service - deposits, withdrawals and the derived balance.
//!
//! Creating a statement runs inside one unit of work that first locks the
//! owning user. Every writer for that user goes through the same lock, so
//! the balance read for the insufficient-funds check cannot change before
//! the withdrawal is appended.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{balance_of, Balance, NewStatement, OperationType, Statement};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Statement service trait for dependency injection.
#[async_trait]
pub trait StatementService: Send + Sync {
    /// Append a deposit or withdrawal to the user's ledger
    async fn create_statement(&self, statement: NewStatement) -> AppResult<Statement>;

    /// All statements of a user together with the current balance
    async fn get_balance(&self, user_id: Uuid) -> AppResult<Balance>;

    /// One statement owned by the user
    async fn get_statement(&self, user_id: Uuid, statement_id: Uuid) -> AppResult<Statement>;
}

/// Concrete implementation of StatementService using Unit of Work.
pub struct StatementManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StatementManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StatementService for StatementManager<U> {
    async fn create_statement(&self, statement: NewStatement) -> AppResult<Statement> {
        statement.validate()?;

        let created = crate::with_transaction!(self.uow, |ctx| {
            ctx.users()
                .lock_by_id(statement.user_id)
                .await?
                .ok_or(AppError::UserNotFound)?;

            if statement.kind == OperationType::Withdraw {
                let ledger = ctx.statements().list_by_user_id(statement.user_id).await?;
                let balance = balance_of(&ledger)?;

                if statement.amount > balance {
                    tracing::warn!(
                        user_id = %statement.user_id,
                        balance = %balance,
                        requested = %statement.amount,
                        "Withdrawal rejected"
                    );
                    return Err(AppError::InsufficientFunds {
                        balance,
                        requested: statement.amount,
                    });
                }
            }

            ctx.statements().create(statement).await
        })?;

        tracing::info!(
            statement_id = %created.id,
            user_id = %created.user_id,
            kind = %created.kind,
            amount = %created.amount,
            "Statement created"
        );

        Ok(created)
    }

    async fn get_balance(&self, user_id: Uuid) -> AppResult<Balance> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let statements = self.uow.statements().list_by_user_id(user_id).await?;
        Balance::from_statements(statements)
    }

    async fn get_statement(&self, user_id: Uuid, statement_id: Uuid) -> AppResult<Statement> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.uow
            .statements()
            .find_by_id(statement_id)
            .await?
            // Someone else's statement is reported as missing
            .filter(|statement| statement.belongs_to(user_id))
            .ok_or(AppError::StatementNotFound)
    }
}
