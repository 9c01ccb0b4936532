//! Migration: Create challenges table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Challenges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Challenges::Number)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Challenges::Name).string().not_null())
                    .col(ColumnDef::new(Challenges::Description).text().not_null())
                    .col(ColumnDef::new(Challenges::ImageUrl).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_challenges_number")
                    .table(Challenges::Table)
                    .col(Challenges::Number)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Challenges::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Challenges {
    Table,
    Id,
    Number,
    Name,
    Description,
    #[iden = "image_url"]
    ImageUrl,
}
