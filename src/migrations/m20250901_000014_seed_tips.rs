//! Migration: Seed starter tips
//!
//! Ships a small pool for the rotation script to cycle through; exactly one
//! starts active.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

use super::m20250901_000011_create_tips::Tips;

const STARTER_TIPS: [(&str, bool); 3] = [
    (
        "Never stake more than you can afford to lose. Treat every bet as the cost of entertainment, not an investment.",
        true,
    ),
    (
        "Odds of 2.00 imply a 50% probability. Compare the implied probability with your own estimate before betting.",
        false,
    ),
    (
        "Avoid chasing losses. A losing streak does not make the next bet more likely to win.",
        false,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (content, active) in STARTER_TIPS {
            let insert = Query::insert()
                .into_table(Tips::Table)
                .columns([Tips::Content, Tips::Active])
                .values_panic([content.into(), active.into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Tips::Table).to_owned())
            .await
    }
}
