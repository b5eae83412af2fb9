//! Read-only catalog access
//!
//! Two backends answer the same two questions (which databases exist, which
//! tables a database holds):
//! - `client`: shells out to the `mysql` binary, inheriting its option files
//! - `native`: talks to the server directly through sqlx

use async_trait::async_trait;
use dbprobe_common::config::{Backend, TomlConfig};
use dbprobe_common::{Error, Result};

mod client;
mod native;

pub use client::MysqlClientCatalog;
pub use native::NativeCatalog;

/// Catalog queries needed by the checks
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Backend identifier for logs ("client", "native")
    fn backend_name(&self) -> &'static str;

    /// Names of all databases visible to the connecting user
    async fn list_databases(&self) -> Result<Vec<String>>;

    /// Names of the tables in `database`
    async fn list_tables(&self, database: &str) -> Result<Vec<String>>;
}

/// Create the backend selected in `config`
///
/// Connections are opened lazily, so an unreachable server shows up as a
/// failed check rather than an error here.
pub fn build_catalog(config: &TomlConfig) -> Result<Box<dyn Catalog>> {
    match config.backend {
        Backend::Client => Ok(Box::new(MysqlClientCatalog::from_config(&config.client))),
        Backend::Native => {
            let url = config.native.url.as_deref().ok_or_else(|| {
                Error::Config("Native backend requires a connection URL".to_string())
            })?;
            Ok(Box::new(NativeCatalog::connect_lazy(
                url,
                config.client.timeout(),
            )?))
        }
    }
}
