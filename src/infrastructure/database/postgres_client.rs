use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::{Database, ServiceIdentity};

/// Builds the connection options for the service.
///
/// Starts from the driver defaults (which read `PGHOST`, `PGPORT`,
/// `PGDATABASE`, `PGUSER`, `PGPASSWORD`), applies explicit config fields on
/// top, then tags the connection with the service identity.
pub fn connect_options(config: &DatabaseConfig, identity: &ServiceIdentity) -> PgConnectOptions {
    // ---
    let mut options = PgConnectOptions::new();

    if let Some(host) = &config.host {
        options = options.host(host);
    }
    if let Some(port) = config.port {
        options = options.port(port);
    }
    if let Some(database) = &config.database {
        options = options.database(database);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    options = options.application_name(&identity.service_name);
    if let Some(schema) = &identity.schema_name {
        options = options.options([("search_path", schema.as_str())]);
    }

    options
}

/// Creates a lazily-connecting Postgres client scoped to the service.
///
/// No connection is opened here; the pool connects on first use. Must be
/// called from within a tokio runtime.
pub fn create_postgres_client(
    config: &DatabaseConfig,
    identity: &ServiceIdentity,
) -> Result<PostgresClient> {
    // ---
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(connect_options(config, identity));

    tracing::debug!(
        service = %identity.service_name,
        schema = identity.schema_name.as_deref().unwrap_or("public"),
        max_connections = config.max_connections,
        "Created Postgres pool"
    );

    Ok(PostgresClient::new(pool, identity.clone()))
}

pub struct PostgresClient {
    // ---
    pool: PgPool,
    identity: ServiceIdentity,
}

impl PostgresClient {
    // ---
    pub fn new(pool: PgPool, identity: ServiceIdentity) -> Self {
        // ---
        Self { pool, identity }
    }
}

#[async_trait::async_trait]
impl Database for PostgresClient {
    // ---
    fn identity(&self) -> &ServiceIdentity {
        // ---
        &self.identity
    }

    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Postgres ping failed")?;

        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        // ---
        let Some(schema) = &self.identity.schema_name else {
            return Ok(());
        };

        // Identifiers cannot be bound as parameters, so quote it ourselves.
        let statement = format!(
            "CREATE SCHEMA IF NOT EXISTS \"{}\"",
            schema.replace('"', "\"\"")
        );
        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create schema {schema}"))?;

        Ok(())
    }

    async fn close(&self) {
        // ---
        self.pool.close().await;
    }
}
