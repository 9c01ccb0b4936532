//! Migration: Create games table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::HomeTeam).string().not_null())
                    .col(ColumnDef::new(Games::AwayTeam).string().not_null())
                    .col(
                        ColumnDef::new(Games::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Games::HomeScore).integer().null())
                    .col(ColumnDef::new(Games::AwayScore).integer().null())
                    .col(ColumnDef::new(Games::GameState).string_len(16).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Games {
    Table,
    Id,
    #[iden = "home_team"]
    HomeTeam,
    #[iden = "away_team"]
    AwayTeam,
    #[iden = "scheduled_at"]
    ScheduledAt,
    #[iden = "home_score"]
    HomeScore,
    #[iden = "away_score"]
    AwayScore,
    #[iden = "game_state"]
    GameState,
}
