//! Migration: Create user_challenges table

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_users::Users;
use super::m20250901_000003_create_challenges::Challenges;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserChallenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserChallenges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::ChallengeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::ProgressPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::Blocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserChallenges::DetailSeen)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenges_user")
                            .from(UserChallenges::Table, UserChallenges::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenges_challenge")
                            .from(UserChallenges::Table, UserChallenges::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness backs the reject-on-duplicate enrollment policy and
        // closes the unblock-next check-then-create race window.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_challenges_user_challenge")
                    .table(UserChallenges::Table)
                    .col(UserChallenges::UserId)
                    .col(UserChallenges::ChallengeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(UserChallenges::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum UserChallenges {
    Table,
    Id,
    #[iden = "user_id"]
    UserId,
    #[iden = "challenge_id"]
    ChallengeId,
    #[iden = "progress_percentage"]
    ProgressPercentage,
    Completed,
    Blocked,
    #[iden = "detail_seen"]
    DetailSeen,
}
