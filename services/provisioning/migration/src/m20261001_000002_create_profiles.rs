use sea_orm_migration::prelude::*;

use posyandu_provisioning_schema::profiles::{NATIONAL_ID_UNIQUE_KEY, PHONE_UNIQUE_KEY};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    // No foreign key to the identity store: it lives outside this database.
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::FullName).string().not_null())
                    .col(ColumnDef::new(Profiles::Phone).string_len(15).not_null())
                    .col(ColumnDef::new(Profiles::NationalId).string_len(16))
                    .col(ColumnDef::new(Profiles::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Profiles::HealthPostId).uuid())
                    .col(
                        ColumnDef::new(Profiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Profiles::UsesDefaultPassword)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Profiles::CreatedBy).uuid())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::HealthPostId)
                            .to(HealthPosts::Table, HealthPosts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .check(
                        Expr::col(Profiles::Role)
                            .eq("ADMIN")
                            .or(Expr::col(Profiles::HealthPostId).is_not_null()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Profiles::Table)
                    .col(Profiles::Phone)
                    .unique()
                    .name(PHONE_UNIQUE_KEY)
                    .to_owned(),
            )
            .await?;

        // NULLs never collide, so accounts without a NIK are unaffected.
        manager
            .create_index(
                Index::create()
                    .table(Profiles::Table)
                    .col(Profiles::NationalId)
                    .unique()
                    .name(NATIONAL_ID_UNIQUE_KEY)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Profiles::Table)
                    .col(Profiles::HealthPostId)
                    .name("idx_profiles_health_post_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Phone,
    NationalId,
    Role,
    HealthPostId,
    IsActive,
    UsesDefaultPassword,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum HealthPosts {
    Table,
    Id,
}
