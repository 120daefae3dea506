//! Migration: Create statements table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Statements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Statements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Statements::UserId).uuid().not_null())
                    .col(ColumnDef::new(Statements::Type).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Statements::Amount)
                            .decimal_len(20, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Statements::Description).text().not_null())
                    .col(
                        ColumnDef::new(Statements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(&mut owner_foreign_key())
                    .to_owned(),
            )
            .await?;

        // Balance and listing queries scan one user's ledger in order
        manager
            .create_index(
                Index::create()
                    .name("idx_statements_user_id_created_at")
                    .table(Statements::Table)
                    .col(Statements::UserId)
                    .col(Statements::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Statements::Table).to_owned())
            .await
    }
}

/// Statements are append-only, so a user with statements cannot be deleted.
fn owner_foreign_key() -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name("fk_statements_user_id")
        .from(Statements::Table, Statements::UserId)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .to_owned()
}


#[derive(Iden)]
enum Statements {
    Table,
    Id,
    UserId,
    Type,
    Amount,
    Description,
    CreatedAt,
}
