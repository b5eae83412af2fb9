//! Database presence checks
//!
//! Two assertions per database, always in this order:
//! 1. the name appears as an exact row of the database listing
//! 2. the database holds at least one table
//!
//! A failed query never aborts the run. It becomes a failed assertion
//! with the error text as a TAP diagnostic.

use crate::catalog::Catalog;
use dbprobe_common::{Result, TapSummary, TapWriter};
use std::io::Write;
use tracing::{debug, warn};

/// Assertions emitted per database
pub const CHECKS_PER_DATABASE: usize = 2;

/// How an outcome is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// String comparison, reported with got/expected diagnostics
    Equality,
    /// Plain pass/fail
    NonEmpty,
}

/// Result of one check, ready to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub description: String,
    pub passed: bool,
    pub got: String,
    pub expected: String,
    /// Query failure, if the check could not run
    pub error: Option<String>,
}

impl CheckOutcome {
    /// Write this outcome as one TAP assertion plus diagnostics
    pub fn report<W: Write>(&self, tap: &mut TapWriter<W>) -> Result<()> {
        match self.kind {
            CheckKind::Equality => {
                tap.is(&self.got, &self.expected, &self.description)?;
            }
            CheckKind::NonEmpty => {
                tap.ok(self.passed, &self.description)?;
                if !self.passed && self.error.is_none() {
                    tap.diag(&format!("    got: {}", self.got))?;
                    tap.diag(&format!("    expected: {}", self.expected))?;
                }
            }
        }

        if let Some(error) = &self.error {
            tap.diag(error)?;
        }
        Ok(())
    }
}

/// Check that `name` is listed by the server
///
/// Only an exact row match counts: `api_production_old` does not satisfy
/// `api_production`.
pub async fn check_database_exists(catalog: &dyn Catalog, name: &str) -> CheckOutcome {
    let mut outcome = CheckOutcome {
        kind: CheckKind::Equality,
        description: "Checking if database exists".to_string(),
        passed: false,
        got: String::new(),
        expected: name.to_string(),
        error: None,
    };

    match catalog.list_databases().await {
        Ok(databases) => {
            if let Some(found) = databases.into_iter().find(|d| d == name) {
                outcome.passed = true;
                outcome.got = found;
            } else {
                debug!(database = name, "Database not listed by server");
            }
        }
        Err(e) => {
            warn!(database = name, error = %e, "Failed to list databases");
            outcome.error = Some(e.to_string());
        }
    }

    outcome
}

/// Check that `name` holds at least one table
pub async fn check_database_has_tables(catalog: &dyn Catalog, name: &str) -> CheckOutcome {
    let mut outcome = CheckOutcome {
        kind: CheckKind::NonEmpty,
        description: format!("Checking if tables in database {}", name),
        passed: false,
        got: String::new(),
        expected: "at least 1 table".to_string(),
        error: None,
    };

    match catalog.list_tables(name).await {
        Ok(tables) => {
            debug!(database = name, tables = tables.len(), "Listed tables");
            outcome.passed = !tables.is_empty();
            outcome.got = match tables.len() {
                1 => "1 table".to_string(),
                n => format!("{} tables", n),
            };
        }
        Err(e) => {
            warn!(database = name, error = %e, "Failed to list tables");
            outcome.error = Some(e.to_string());
        }
    }

    outcome
}

/// Run both checks for every database and report them as one TAP stream
pub async fn run_suite<W: Write>(
    catalog: &dyn Catalog,
    databases: &[String],
    tap: &mut TapWriter<W>,
) -> Result<TapSummary> {
    if databases.is_empty() {
        tap.skip_all("no databases configured")?;
        return tap.finish();
    }

    tap.plan(databases.len() * CHECKS_PER_DATABASE)?;

    for name in databases {
        check_database_exists(catalog, name).await.report(tap)?;
        check_database_has_tables(catalog, name).await.report(tap)?;
    }

    tap.finish()
}
