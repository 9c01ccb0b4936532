//! Migration: Create bet_games join table

use sea_orm_migration::prelude::*;

use super::m20250901_000007_create_games::Games;
use super::m20250901_000008_create_bets::Bets;
use super::m20250901_000009_create_championships::Championships;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BetGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BetGames::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BetGames::BetId).big_integer().not_null())
                    .col(ColumnDef::new(BetGames::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(BetGames::ChampionshipId)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bet_games_bet")
                            .from(BetGames::Table, BetGames::BetId)
                            .to(Bets::Table, Bets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bet_games_game")
                            .from(BetGames::Table, BetGames::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bet_games_championship")
                            .from(BetGames::Table, BetGames::ChampionshipId)
                            .to(Championships::Table, Championships::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bet_games_bet_game")
                    .table(BetGames::Table)
                    .col(BetGames::BetId)
                    .col(BetGames::GameId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BetGames::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BetGames {
    Table,
    Id,
    #[iden = "bet_id"]
    BetId,
    #[iden = "game_id"]
    GameId,
    #[iden = "championship_id"]
    ChampionshipId,
}
