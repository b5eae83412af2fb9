//! Catalog backed by the external `mysql` command-line client
//!
//! Each query runs as
//! `mysql <extra args> --batch --skip-column-names [--database=<db>] -e <query>`.
//! Batch mode prints one row per line with no table borders, and
//! skipping column names drops the `Database` / `Tables_in_<db>` header.
//! Host, user and password come from the client's own option files.

use super::Catalog;
use async_trait::async_trait;
use dbprobe_common::config::ClientConfig;
use dbprobe_common::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

const SHOW_DATABASES: &str = "show databases";
const SHOW_TABLES: &str = "show tables";

/// Runs catalog queries through the `mysql` binary
pub struct MysqlClientCatalog {
    binary: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl MysqlClientCatalog {
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.binary.clone(), config.args.clone(), config.timeout())
    }

    fn command(&self, query: &str, database: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .arg("--batch")
            .arg("--skip-column-names");

        // Option form so a name starting with '-' is never read as a flag
        if let Some(database) = database {
            cmd.arg(format!("--database={}", database));
        }

        cmd.arg("-e")
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run one query and return its output rows
    async fn run(&self, query: &str, database: Option<&str>) -> Result<Vec<String>> {
        debug!(
            binary = %self.binary.display(),
            query,
            database,
            "Invoking database client"
        );

        let output = tokio::time::timeout(self.timeout, self.command(query, database).output())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(Error::Client {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(parse_rows(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[async_trait]
impl Catalog for MysqlClientCatalog {
    fn backend_name(&self) -> &'static str {
        "client"
    }

    async fn list_databases(&self) -> Result<Vec<String>> {
        self.run(SHOW_DATABASES, None).await
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        self.run(SHOW_TABLES, Some(database)).await
    }
}

/// Split batch-mode output into non-empty rows
fn parse_rows(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
