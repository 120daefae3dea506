//! Statement database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{OperationType, Statement};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "statements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// "deposit" or "withdraw"
    #[sea_orm(column_name = "type")]
    pub kind: String,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails only if the row holds an operation type this build doesn't know.
impl TryFrom<Model> for Statement {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Statement {
            id: model.id,
            user_id: model.user_id,
            kind: model.kind.parse::<OperationType>()?,
            amount: model.amount,
            description: model.description,
            created_at: model.created_at,
        })
    }
}

impl From<Statement> for ActiveModel {
    fn from(statement: Statement) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(statement.id),
            user_id: Set(statement.user_id),
            kind: Set(statement.kind.as_str().to_string()),
            amount: Set(statement.amount),
            description: Set(statement.description),
            created_at: Set(statement.created_at),
        }
    }
}
