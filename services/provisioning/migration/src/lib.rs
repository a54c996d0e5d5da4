pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_health_posts;
mod m20261001_000002_create_profiles;
mod m20261001_000003_create_children;
mod m20261001_000004_create_parent_children;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_health_posts::Migration),
            Box::new(m20261001_000002_create_profiles::Migration),
            Box::new(m20261001_000003_create_children::Migration),
            Box::new(m20261001_000004_create_parent_children::Migration),
        ]
    }
}
