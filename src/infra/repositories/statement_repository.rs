//! Statement repository: append-only storage contract and SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::statement::{self, ActiveModel, Entity as StatementEntity};
use crate::domain::{NewStatement, Statement};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Statement repository trait for dependency injection.
///
/// There is no update or delete: statements are never mutated once stored.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StatementRepository: Send + Sync {
    /// Append a statement, assigning its id and timestamp
    async fn create(&self, statement: NewStatement) -> AppResult<Statement>;

    /// Find statement by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Statement>>;

    /// All statements of a user in insertion order
    async fn list_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Statement>>;
}

pub(crate) async fn create<C: ConnectionTrait>(
    conn: &C,
    new_statement: NewStatement,
) -> AppResult<Statement> {
    let active_model = ActiveModel::from(new_statement.into_statement());
    let model = active_model.insert(conn).await.map_err(AppError::from)?;
    Statement::try_from(model)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<Statement>> {
    StatementEntity::find_by_id(id)
        .one(conn)
        .await
        .map_err(AppError::from)?
        .map(Statement::try_from)
        .transpose()
}

pub(crate) async fn list_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<Vec<Statement>> {
    let models = StatementEntity::find()
        .filter(statement::Column::UserId.eq(user_id))
        .order_by_asc(statement::Column::CreatedAt)
        .order_by_asc(statement::Column::Id)
        .all(conn)
        .await
        .map_err(AppError::from)?;

    models.into_iter().map(Statement::try_from).collect()
}

/// SeaORM-backed statement repository
pub struct StatementStore {
    db: DatabaseConnection,
}

impl StatementStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatementRepository for StatementStore {
    async fn create(&self, statement: NewStatement) -> AppResult<Statement> {
        create(&self.db, statement).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Statement>> {
        find_by_id(&self.db, id).await
    }

    async fn list_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Statement>> {
        list_by_user_id(&self.db, user_id).await
    }
}
