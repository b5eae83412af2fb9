//! TAP (Test Anything Protocol) producer
//!
//! Writes version 12 TAP to any [`std::io::Write`] sink:
//!
//! ```text
//! 1..2
//! ok 1 - Checking if database exists
//! not ok 2 - Checking if tables in database api_production
//! #   Failed test 'Checking if tables in database api_production'
//! # Looks like you failed 1 test of 2.
//! ```
//!
//! Exit status follows the Test::More convention consumed by `prove`:
//! number of failures (capped at 254), or 255 when the plan was not honored.

use crate::{Error, Result};
use std::io::Write;

/// Highest exit code used to report a failure count
const MAX_FAILURE_EXIT: usize = 254;

/// Exit code for a broken or missing plan
const PLAN_MISMATCH_EXIT: i32 = 255;

/// Counts collected over one TAP stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapSummary {
    /// Planned test count, `None` if no plan line was written
    pub planned: Option<usize>,
    /// Number of assertions emitted
    pub run: usize,
    /// Number of failed assertions
    pub failed: usize,
}

impl TapSummary {
    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        match self.planned {
            Some(planned) if planned == self.run => {
                self.failed.min(MAX_FAILURE_EXIT) as i32
            }
            _ => PLAN_MISMATCH_EXIT,
        }
    }

    /// True when every planned test ran and passed
    pub fn passed(&self) -> bool {
        self.exit_code() == 0
    }
}

/// Streaming TAP writer
pub struct TapWriter<W: Write> {
    out: W,
    planned: Option<usize>,
    run: usize,
    failed: usize,
}

impl<W: Write> TapWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            planned: None,
            run: 0,
            failed: 0,
        }
    }

    /// Write the plan line `1..n`
    ///
    /// Must come before any assertion and may only be written once.
    pub fn plan(&mut self, tests: usize) -> Result<()> {
        self.check_plan_allowed()?;
        writeln!(self.out, "1..{}", tests)?;
        self.planned = Some(tests);
        Ok(())
    }

    /// Plan zero tests and give the reason
    pub fn skip_all(&mut self, reason: &str) -> Result<()> {
        self.check_plan_allowed()?;
        writeln!(self.out, "1..0 # SKIP {}", single_line(reason))?;
        self.planned = Some(0);
        Ok(())
    }

    /// Report a single assertion, returning `passed`
    pub fn ok(&mut self, passed: bool, description: &str) -> Result<bool> {
        self.run += 1;
        let description = escape_description(description);

        if passed {
            writeln!(self.out, "ok {} - {}", self.run, description)?;
        } else {
            self.failed += 1;
            writeln!(self.out, "not ok {} - {}", self.run, description)?;
            writeln!(self.out, "#   Failed test '{}'", description)?;
        }

        Ok(passed)
    }

    /// Report string equality between `got` and `expected`
    pub fn is(&mut self, got: &str, expected: &str, description: &str) -> Result<bool> {
        let passed = self.ok(got == expected, description)?;
        if !passed {
            writeln!(self.out, "#          got: '{}'", single_line(got))?;
            writeln!(self.out, "#     expected: '{}'", single_line(expected))?;
        }
        Ok(passed)
    }

    /// Write a diagnostic, one `# ` line per input line
    pub fn diag(&mut self, message: &str) -> Result<()> {
        for line in message.lines() {
            if line.is_empty() {
                writeln!(self.out, "#")?;
            } else {
                writeln!(self.out, "# {}", line)?;
            }
        }
        Ok(())
    }

    /// Abort the stream with a single `Bail out!` line
    ///
    /// Multi-line reasons are folded onto that one line.
    pub fn bail_out(&mut self, reason: &str) -> Result<()> {
        let reason = reason
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.out, "Bail out! {}", reason)?;
        self.out.flush()?;
        Ok(())
    }

    /// Write closing diagnostics and return the counts
    pub fn finish(&mut self) -> Result<TapSummary> {
        let summary = TapSummary {
            planned: self.planned,
            run: self.run,
            failed: self.failed,
        };

        if summary.failed > 0 {
            writeln!(
                self.out,
                "# Looks like you failed {} test{} of {}.",
                summary.failed,
                if summary.failed == 1 { "" } else { "s" },
                summary.run
            )?;
        }

        match summary.planned {
            Some(planned) if planned != summary.run => {
                writeln!(
                    self.out,
                    "# Looks like you planned {} test{} but ran {}.",
                    planned,
                    if planned == 1 { "" } else { "s" },
                    summary.run
                )?;
            }
            None => writeln!(self.out, "# No tests planned.")?,
            _ => {}
        }

        self.out.flush()?;
        Ok(summary)
    }

    /// Recover the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }

    fn check_plan_allowed(&self) -> Result<()> {
        if self.planned.is_some() {
            return Err(Error::InvalidInput("TAP plan already written".to_string()));
        }
        if self.run > 0 {
            return Err(Error::InvalidInput(
                "TAP plan must precede assertions".to_string(),
            ));
        }
        Ok(())
    }
}

/// `#` starts a directive in TAP, so it is escaped inside descriptions
fn escape_description(description: &str) -> String {
    single_line(description).replace('#', "\\#")
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
