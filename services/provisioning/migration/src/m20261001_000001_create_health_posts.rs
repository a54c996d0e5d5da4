use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HealthPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthPosts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HealthPosts::Name).string().not_null())
                    .col(ColumnDef::new(HealthPosts::Village).string())
                    .col(ColumnDef::new(HealthPosts::Address).string())
                    .col(
                        ColumnDef::new(HealthPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthPosts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HealthPosts {
    Table,
    Id,
    Name,
    Village,
    Address,
    CreatedAt,
}
