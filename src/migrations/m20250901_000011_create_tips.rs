//! Migration: Create tips table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tips::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tips::Content).text().not_null())
                    .col(
                        ColumnDef::new(Tips::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tips::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tips {
    Table,
    Id,
    Content,
    Active,
}
