//! click_logs 表
//!
//! 每次点击一行，包含来源、UTM 参数和设备类型。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClickLogs::LinkId).big_integer().not_null())
                    .col(ColumnDef::new(ClickLogs::UserId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(ClickLogs::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickLogs::Referrer).text().null())
                    .col(ColumnDef::new(ClickLogs::UtmSource).string_len(255).null())
                    .col(ColumnDef::new(ClickLogs::UtmMedium).string_len(255).null())
                    .col(ColumnDef::new(ClickLogs::UtmCampaign).string_len(255).null())
                    .col(ColumnDef::new(ClickLogs::UtmContent).string_len(255).null())
                    .col(ColumnDef::new(ClickLogs::Device).string_len(16).null())
                    .to_owned(),
            )
            .await?;

        // dashboard 按用户 + 时间范围查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_logs_user_time")
                    .table(ClickLogs::Table)
                    .col(ClickLogs::UserId)
                    .col(ClickLogs::ClickedAt)
                    .to_owned(),
            )
            .await?;

        // 单链接时间序列
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_logs_link_time")
                    .table(ClickLogs::Table)
                    .col(ClickLogs::LinkId)
                    .col(ClickLogs::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_logs_link_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_click_logs_user_time").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClickLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickLogs {
    #[sea_orm(iden = "click_logs")]
    Table,
    Id,
    LinkId,
    UserId,
    ClickedAt,
    Referrer,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    Device,
}
