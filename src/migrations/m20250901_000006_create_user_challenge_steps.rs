//! Migration: Create user_challenge_steps table

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_users::Users;
use super::m20250901_000004_create_steps::Steps;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserChallengeSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserChallengeSteps::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserChallengeSteps::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserChallengeSteps::ChallengeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserChallengeSteps::StepId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserChallengeSteps::State)
                            .string_len(16)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenge_steps_user")
                            .from(UserChallengeSteps::Table, UserChallengeSteps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenge_steps_step")
                            .from(UserChallengeSteps::Table, UserChallengeSteps::StepId)
                            .to(Steps::Table, Steps::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_challenge_steps_user_step")
                    .table(UserChallengeSteps::Table)
                    .col(UserChallengeSteps::UserId)
                    .col(UserChallengeSteps::StepId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_challenge_steps_user_challenge")
                    .table(UserChallengeSteps::Table)
                    .col(UserChallengeSteps::UserId)
                    .col(UserChallengeSteps::ChallengeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(UserChallengeSteps::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum UserChallengeSteps {
    Table,
    Id,
    #[iden = "user_id"]
    UserId,
    #[iden = "challenge_id"]
    ChallengeId,
    #[iden = "step_id"]
    StepId,
    State,
}
