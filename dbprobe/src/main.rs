//! dbprobe - checks that databases exist and are populated
//!
//! Prints TAP on stdout and exits with the TAP status: 0 when every check
//! passed, the failure count (capped at 254) otherwise, 255 when the run
//! could not start.

use anyhow::Result;
use clap::Parser;
use dbprobe_common::config::{Backend, CliOverrides, ConfigResolver, LogFormat};
use dbprobe_common::TapWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Exit status when configuration prevents the run
const BAIL_OUT_EXIT: u8 = 255;

/// Command-line arguments for dbprobe
#[derive(Parser, Debug)]
#[command(name = "dbprobe")]
#[command(about = "Check that databases exist and contain tables, reporting TAP")]
#[command(version)]
struct Args {
    /// Database to check (repeatable, or comma separated)
    #[arg(short, long = "database", value_name = "NAME")]
    databases: Vec<String>,

    /// Catalog backend: client (mysql binary) or native (direct connection)
    #[arg(short, long, value_parser = parse_backend)]
    backend: Option<Backend>,

    /// Path to the mysql client binary
    #[arg(long, value_name = "PATH")]
    mysql_bin: Option<PathBuf>,

    /// Extra argument passed to the mysql client (repeatable)
    #[arg(long = "client-arg", value_name = "ARG", allow_hyphen_values = true)]
    client_args: Vec<String>,

    /// Connection URL for the native backend
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Per-query timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Configuration file (default: ~/.config/dbprobe/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            databases: args.databases,
            backend: args.backend,
            mysql_bin: args.mysql_bin,
            client_args: args.client_args,
            url: args.url,
            timeout_secs: args.timeout,
            log_level: args.log_level,
            log_format: args.log_format,
        }
    }
}

fn parse_backend(s: &str) -> std::result::Result<Backend, String> {
    s.parse().map_err(|e: dbprobe_common::Error| e.to_string())
}

fn parse_log_format(s: &str) -> std::result::Result<LogFormat, String> {
    s.parse().map_err(|e: dbprobe_common::Error| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            // TAP abort line, understood by harnesses as a fatal error
            let _ = TapWriter::new(std::io::stdout()).bail_out(&e.to_string());
            // Full error on stderr; subscriber may not be installed yet
            eprintln!("dbprobe: {:#}", e);
            ExitCode::from(BAIL_OUT_EXIT)
        }
    }
}

async fn run(args: Args) -> Result<u8> {
    let config = ConfigResolver::new(args.into()).resolve()?;

    dbprobe::logging::init(&config.logging)?;

    info!(
        "Starting dbprobe v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let summary = dbprobe::probe(&config, std::io::stdout().lock()).await?;

    info!(
        run = summary.run,
        failed = summary.failed,
        "Database checks complete"
    );

    Ok(summary.exit_code() as u8)
}
