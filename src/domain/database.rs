use super::identity::ServiceIdentity;
use anyhow::Result;
use std::sync::Arc;

/// Abstraction for the service's relational database handle.
///
/// Pooling, retries inside the driver and the query interface belong to
/// the backing library. This trait only covers what startup and health
/// checks need.
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    // ---
    /// Identity the client was tagged with at construction.
    fn identity(&self) -> &ServiceIdentity;

    /// Round-trip a trivial query to verify connectivity.
    async fn ping(&self) -> Result<()>;

    /// Create the service schema if it does not exist yet.
    async fn ensure_schema(&self) -> Result<()>;

    /// Close all pooled connections.
    async fn close(&self);
}

/// Type alias for any backend that implements Database.
pub type DatabasePtr = Arc<dyn Database>;
