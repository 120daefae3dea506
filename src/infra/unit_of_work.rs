//! Unit of Work pattern implementation.
//!
//! Gives services one entry point to all repositories and runs a group of
//! repository calls as a single atomic step. The Postgres implementation
//! wraps a database transaction; the in-memory one serializes writers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::repositories::{
    statement_repository, user_repository, InMemoryStatementStore, InMemoryUserStore,
    StatementRepository, StatementStore, UserRepository, UserStore,
};
use crate::domain::{NewStatement, NewUser, Statement, User};
use crate::errors::{AppError, AppResult};

/// Future returned by a transaction body.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because `transaction` is generic; tests use
/// `MemoryPersistence` or mock the repositories it hands out.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get statement repository
    fn statements(&self) -> Arc<dyn StatementRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access scoped to one transaction.
pub struct TransactionContext<'a> {
    users: Arc<dyn UserRepository + 'a>,
    statements: Arc<dyn StatementRepository + 'a>,
}

impl<'a> TransactionContext<'a> {
    pub fn new(
        users: Arc<dyn UserRepository + 'a>,
        statements: Arc<dyn StatementRepository + 'a>,
    ) -> Self {
        Self { users, statements }
    }

    pub fn users(&self) -> Arc<dyn UserRepository + 'a> {
        self.users.clone()
    }

    pub fn statements(&self) -> Arc<dyn StatementRepository + 'a> {
        self.statements.clone()
    }
}

/// Postgres-backed UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    statement_repo: Arc<StatementStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let statement_repo = Arc::new(StatementStore::new(db.clone()));
        Self {
            db,
            user_repo,
            statement_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn statements(&self) -> Arc<dyn StatementRepository> {
        self.statement_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(
            Arc::new(TxUserRepository::new(&txn)),
            Arc::new(TxStatementRepository::new(&txn)),
        );
        let result = f(ctx).await;

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// User repository bound to an open transaction.
///
/// `lock_by_id` issues `SELECT ... FOR UPDATE`, so the row stays locked
/// until the transaction ends.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> UserRepository for TxUserRepository<'a> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    async fn lock_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::lock_by_id(self.txn, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, user).await
    }
}

/// Statement repository bound to an open transaction.
pub struct TxStatementRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxStatementRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> StatementRepository for TxStatementRepository<'a> {
    async fn create(&self, statement: NewStatement) -> AppResult<Statement> {
        statement_repository::create(self.txn, statement).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Statement>> {
        statement_repository::find_by_id(self.txn, id).await
    }

    async fn list_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Statement>> {
        statement_repository::list_by_user_id(self.txn, user_id).await
    }
}

/// In-memory UnitOfWork.
///
/// Transactions run one at a time under a process-wide lock. Writes made
/// before a failing step are not undone, so transaction bodies should
/// check everything before they write.
#[derive(Default)]
pub struct MemoryPersistence {
    users: InMemoryUserStore,
    statements: InMemoryStatementStore,
    write_lock: Mutex<()>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWork for MemoryPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.users.clone())
    }

    fn statements(&self) -> Arc<dyn StatementRepository> {
        Arc::new(self.statements.clone())
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let ctx = TransactionContext::new(
            Arc::new(self.users.clone()),
            Arc::new(self.statements.clone()),
        );
        f(ctx).await
    }
}

/// Run a transaction body without spelling out the boxing.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_memory_transaction_sees_shared_stores() {
        let uow = MemoryPersistence::new();
        let user = uow
            .users()
            .create(NewUser {
                name: "Jean".to_string(),
                email: "jean@email.com.br".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let user_id = user.id;

        let created = with_transaction!(uow, |ctx| {
            let locked = ctx.users().lock_by_id(user_id).await?;
            assert!(locked.is_some());
            ctx.statements()
                .create(NewStatement::deposit(user_id, dec!(10), "cash"))
                .await
        })
        .unwrap();

        let listed = uow.statements().list_by_user_id(user_id).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_memory_transaction_returns_body_error() {
        let uow = MemoryPersistence::new();
        let result: AppResult<()> =
            with_transaction!(uow, |_ctx| { Err(AppError::UserNotFound) });
        assert!(matches!(result, Err(AppError::UserNotFound)));
    }
}
