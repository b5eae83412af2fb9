//! dbprobe library - database presence checks reported as TAP
//!
//! Verifies that each configured database exists on a MySQL-compatible
//! server and holds at least one table. Results stream out as TAP so a
//! harness such as `prove` can consume them.

use dbprobe_common::config::TomlConfig;
use dbprobe_common::{Result, TapSummary, TapWriter};
use std::io::Write;
use tracing::info;

pub mod catalog;
pub mod checks;
pub mod logging;

pub use catalog::{build_catalog, Catalog};
pub use checks::{run_suite, CheckOutcome};

/// Run every configured check against the configured backend
///
/// TAP goes to `out`; the returned summary carries the exit status.
pub async fn probe<W: Write>(config: &TomlConfig, out: W) -> Result<TapSummary> {
    let catalog = build_catalog(config)?;
    info!(
        backend = catalog.backend_name(),
        databases = config.databases.len(),
        "Running database checks"
    );

    let mut tap = TapWriter::new(out);
    run_suite(catalog.as_ref(), &config.databases, &mut tap).await
}
