//! Migration: Create bets table

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bets::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Bets::Amount).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Bets::Odds).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Bets::PotentialPayoff)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bets::State).string_len(16).not_null())
                    .col(ColumnDef::new(Bets::Result).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Bets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bets_user")
                            .from(Bets::Table, Bets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bets_user")
                    .table(Bets::Table)
                    .col(Bets::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bets::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bets {
    Table,
    Id,
    #[iden = "user_id"]
    UserId,
    Amount,
    Odds,
    #[iden = "potential_payoff"]
    PotentialPayoff,
    State,
    Result,
    #[iden = "created_at"]
    CreatedAt,
}
