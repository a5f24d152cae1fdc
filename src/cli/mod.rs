//! CLI module for intake
//!
//! Provides command-line interface for:
//! - init: Write a default config and an example schema
//! - check: Validate one payload from a file or stdin
//! - schemas: List registered schemas
//! - serve: Run the HTTP server

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init, run, run_command, schemas, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_payload, write_json};
