use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Children::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Children::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Children::FullName).string().not_null())
                    .col(ColumnDef::new(Children::BirthDate).date())
                    .col(ColumnDef::new(Children::HealthPostId).uuid().not_null())
                    .col(
                        ColumnDef::new(Children::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Children::Table, Children::HealthPostId)
                            .to(HealthPosts::Table, HealthPosts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Children::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Children {
    Table,
    Id,
    FullName,
    BirthDate,
    HealthPostId,
    CreatedAt,
}

#[derive(Iden)]
enum HealthPosts {
    Table,
    Id,
}
