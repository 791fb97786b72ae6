use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    ExpenseId,
    ChangeType,
    ChangedBy,
    OldValues,
    NewValues,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // No foreign key: the trail must survive expense deletion.
                    .col(
                        ColumnDef::new(AuditLogs::ExpenseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLogs::ChangeType).string().not_null())
                    .col(
                        ColumnDef::new(AuditLogs::ChangedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLogs::OldValues).text())
                    .col(ColumnDef::new(AuditLogs::NewValues).text())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-audit_logs-expense_id")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::ExpenseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await
    }
}
