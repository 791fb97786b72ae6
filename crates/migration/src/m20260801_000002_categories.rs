use sea_orm::{DbBackend, Statement};
use sea_orm_migration::{SchemaManagerConnection, prelude::*};

use crate::m20260801_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(crate) enum Categories {
    Table,
    Id,
    UserId,
    Name,
    ColorCode,
    IsSystem,
}

/// Shared starter categories, visible to every account.
const SYSTEM_CATEGORIES: &[(&str, &str)] = &[
    ("Food", "#e74c3c"),
    ("Transport", "#3498db"),
    ("Shopping", "#9b59b6"),
    ("Entertainment", "#f39c12"),
    ("Bills", "#16a085"),
    ("Health", "#2ecc71"),
    ("Education", "#34495e"),
    ("Other", "#95a5a6"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).big_integer())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::ColorCode)
                            .string()
                            .not_null()
                            .default("#3498db"),
                    )
                    .col(
                        ColumnDef::new(Categories::IsSystem)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        seed_system_categories(manager.get_connection()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

async fn seed_system_categories(db: &SchemaManagerConnection<'_>) -> Result<(), DbErr> {
    let backend: DbBackend = db.get_database_backend();
    for (name, color) in SYSTEM_CATEGORIES {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO categories (user_id, name, color_code, is_system) \
             VALUES (NULL, ?, ?, TRUE);",
            [(*name).into(), (*color).into()],
        ))
        .await?;
    }
    Ok(())
}
