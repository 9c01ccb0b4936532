//! Migration: Create questionnaires table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questionnaires::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questionnaires::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questionnaires::Question)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questionnaires::Options).json().not_null())
                    .col(
                        ColumnDef::new(Questionnaires::CorrectOption)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Questionnaires::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Questionnaires {
    Table,
    Id,
    Question,
    Options,
    #[iden = "correct_option"]
    CorrectOption,
}
