//! # dbprobe common library
//!
//! Shared code for the dbprobe checker:
//! - Error types
//! - Configuration loading and source precedence
//! - TAP (Test Anything Protocol) output

pub mod config;
pub mod error;
pub mod tap;

pub use error::{Error, Result};
pub use tap::{TapSummary, TapWriter};
