//! In-process catalog over a sqlx MySQL pool

use super::Catalog;
use async_trait::async_trait;
use dbprobe_common::{Error, Result};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::debug;

/// Catalog backed by a single pooled MySQL connection
pub struct NativeCatalog {
    pool: MySqlPool,
    timeout: Duration,
}

impl NativeCatalog {
    /// Build the pool without connecting; the first query opens the connection
    ///
    /// `timeout` bounds each query, connection setup included.
    pub fn connect_lazy(url: &str, timeout: Duration) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            // Outer per-query timeout must fire first so expiry reads as Timeout
            .acquire_timeout(timeout.saturating_mul(2))
            .connect_lazy(url)?;
        Ok(Self { pool, timeout })
    }

    async fn fetch_names(&self, sql: &str) -> Result<Vec<String>> {
        tokio::time::timeout(self.timeout, query_names(&self.pool, sql))
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
    }
}

#[async_trait]
impl Catalog for NativeCatalog {
    fn backend_name(&self) -> &'static str {
        "native"
    }

    async fn list_databases(&self) -> Result<Vec<String>> {
        let names = self.fetch_names("SHOW DATABASES").await?;
        debug!(count = names.len(), "Listed databases");
        Ok(names)
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        // SHOW statements cannot take bind parameters
        let sql = format!("SHOW TABLES FROM {}", quote_identifier(database));
        let names = self.fetch_names(&sql).await?;
        debug!(database, count = names.len(), "Listed tables");
        Ok(names)
    }
}

/// Run a single-column SHOW statement
///
/// Some server versions flag SHOW result columns as binary, which sqlx refuses
/// to decode as `String`; reading raw bytes accepts both.
async fn query_names(pool: &MySqlPool, sql: &str) -> Result<Vec<String>> {
    let rows = sqlx::query_scalar::<_, Vec<u8>>(sql).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|raw| String::from_utf8_lossy(&raw).into_owned())
        .collect())
}

/// Backtick-quote an identifier, doubling embedded backticks
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
