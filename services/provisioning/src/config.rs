use std::time::Duration;

/// Provisioning service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ProvisioningConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `PROVISIONING_PORT`.
    pub provisioning_port: u16,
    /// Base URL of the identity store admin API. Env var: `IDENTITY_URL`.
    pub identity_url: Option<String>,
    /// Service-role key for the identity store. Env var: `IDENTITY_SERVICE_KEY`.
    pub identity_service_key: Option<String>,
    /// Domain appended to login identifiers (default `posyandu.local`).
    pub login_domain: String,
    /// Upper bound for each remote call (default 10 s). Env var: `REMOTE_CALL_TIMEOUT_MS`.
    pub remote_call_timeout: Duration,
    /// Records provisioned at once in bulk mode (default 1).
    pub bulk_concurrency: usize,
    /// Maximum records per bulk request (default 500).
    pub bulk_max_records: usize,
}

impl ProvisioningConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            provisioning_port: parse_env("PROVISIONING_PORT").unwrap_or(3114),
            identity_url: std::env::var("IDENTITY_URL").ok(),
            identity_service_key: std::env::var("IDENTITY_SERVICE_KEY").ok(),
            login_domain: std::env::var("LOGIN_DOMAIN")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "posyandu.local".to_owned()),
            remote_call_timeout: Duration::from_millis(
                parse_env("REMOTE_CALL_TIMEOUT_MS").unwrap_or(10_000),
            ),
            bulk_concurrency: parse_env("BULK_CONCURRENCY")
                .filter(|n| *n > 0)
                .unwrap_or(1),
            bulk_max_records: parse_env("BULK_MAX_RECORDS")
                .filter(|n| *n > 0)
                .unwrap_or(500),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
