//! Migration: Create admin_notifications table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminNotifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminNotifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminNotifications::Title).string().not_null())
                    .col(
                        ColumnDef::new(AdminNotifications::Message)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminNotifications::Kind).string().not_null())
                    .col(
                        ColumnDef::new(AdminNotifications::Source)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminNotifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminNotifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_notifications_is_read")
                    .table(AdminNotifications::Table)
                    .col(AdminNotifications::IsRead)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AdminNotifications::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum AdminNotifications {
    Table,
    Id,
    Title,
    Message,
    Kind,
    Source,
    #[iden = "is_read"]
    IsRead,
    #[iden = "created_at"]
    CreatedAt,
}
