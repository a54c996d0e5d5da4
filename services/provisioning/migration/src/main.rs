use sea_orm_migration::prelude::*;

use posyandu_provisioning_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
