use anyhow::Context as _;
use sea_orm::Database;
use tracing::{info, warn};

use posyandu_core::tracing::init_tracing;
use posyandu_provisioning::config::ProvisioningConfig;
use posyandu_provisioning::infra::identity::HttpIdentityStore;
use posyandu_provisioning::router::build_router;
use posyandu_provisioning::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ProvisioningConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let identity = HttpIdentityStore::new(
        config.identity_url.clone(),
        config.identity_service_key.clone(),
        config.remote_call_timeout,
    )?;
    if !identity.is_configured() {
        warn!("IDENTITY_URL or IDENTITY_SERVICE_KEY missing; account creation will fail");
    }

    let state = AppState {
        db,
        identity,
        login_domain: config.login_domain.clone(),
        call_timeout: config.remote_call_timeout,
        bulk_concurrency: config.bulk_concurrency,
        bulk_max_records: config.bulk_max_records,
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.provisioning_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!(
        login_domain = %config.login_domain,
        bulk_concurrency = config.bulk_concurrency,
        "provisioning service listening on {http_addr}"
    );
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
