mod postgres_client;


use crate::config::DatabaseConfig;
use crate::domain::{Database, DatabasePtr, ServiceIdentity};
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

pub use postgres_client::{connect_options, create_postgres_client, PostgresClient};

/// Delay between two connection attempts during startup.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Creates the service's database client.
///
/// The returned handle is tagged with `identity`. Construction never
/// touches the network and any failure propagates unchanged.
pub fn create_database_client(
    config: &DatabaseConfig,
    identity: &ServiceIdentity,
) -> Result<DatabasePtr> {
    // ---
    Ok(Arc::new(create_postgres_client(config, identity)?))
}

/// Waits for the database to accept connections, then makes sure the
/// service schema exists.
///
/// Part of the startup sequence, not of the client factory.
pub async fn init_database_with_retry(database: &dyn Database, retry_count: u32) -> Result<()> {
    // ---
    let attempts = retry_count.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match database.ping().await {
            Ok(()) => {
                tracing::info!(attempt, "Database is reachable");
                return database.ensure_schema().await;
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, "Database not ready: {err:#}");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                bail!("Database unreachable after {attempts} attempts: {err:#}");
            }
        }
    }
}
