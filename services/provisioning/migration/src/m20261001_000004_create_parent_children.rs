use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParentChildren::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ParentChildren::ParentId).uuid().not_null())
                    .col(ColumnDef::new(ParentChildren::ChildId).uuid().not_null())
                    .col(
                        ColumnDef::new(ParentChildren::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ParentChildren::ParentId)
                            .col(ParentChildren::ChildId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentChildren::Table, ParentChildren::ParentId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentChildren::Table, ParentChildren::ChildId)
                            .to(Children::Table, Children::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParentChildren::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ParentChildren {
    Table,
    ParentId,
    ChildId,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}

#[derive(Iden)]
enum Children {
    Table,
    Id,
}
