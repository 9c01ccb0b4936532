//! Migration: Create steps table

use sea_orm_migration::prelude::*;

use super::m20250901_000003_create_challenges::Challenges;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Steps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Steps::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Steps::ChallengeId).big_integer().not_null())
                    .col(ColumnDef::new(Steps::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Steps::Payload).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_steps_challenge")
                            .from(Steps::Table, Steps::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_steps_challenge")
                    .table(Steps::Table)
                    .col(Steps::ChallengeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Steps::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Steps {
    Table,
    Id,
    #[iden = "challenge_id"]
    ChallengeId,
    Kind,
    Payload,
}
