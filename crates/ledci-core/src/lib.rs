//! ledci-core - shared plumbing for the ledci CI helpers
//!
//! Provides the pieces both the board compiler and the docs publisher lean on:
//! - Running external commands with captured (optionally merged) output
//! - A synchronized printer so concurrent workers keep their lines intact
//! - Git queries for tags and commit SHAs
//! - Centralised tracing initialisation

pub mod error;
pub mod git;
pub mod printer;
pub mod process;
pub mod telemetry;

pub use error::{CiError, Result};
pub use printer::LockedPrinter;
pub use process::{run_command, CommandOutput, CommandSpec};
pub use telemetry::init_tracing;
