//! CLI argument definitions using clap
//!
//! Commands:
//! - intake init --config <path>
//! - intake check --config <path> --schema <id> [--version <v>] [--input <file>]
//! - intake schemas --config <path>
//! - intake serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// intake - schema-driven validation of untrusted payloads
#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration and an example schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./intake.json")]
        config: PathBuf,
    },

    /// Validate one JSON payload and print the outcome
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./intake.json")]
        config: PathBuf,

        /// Schema id
        #[arg(long)]
        schema: String,

        /// Schema version (default: latest registered)
        #[arg(long)]
        version: Option<String>,

        /// Payload file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// List registered schemas
    Schemas {
        /// Path to configuration file
        #[arg(long, default_value = "./intake.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./intake.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["intake", "check", "--schema", "contact"]).unwrap();
        match cli.command {
            Command::Check {
                config,
                schema,
                version,
                input,
            } => {
                assert_eq!(config, PathBuf::from("./intake.json"));
                assert_eq!(schema, "contact");
                assert!(version.is_none());
                assert!(input.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_schema() {
        assert!(Cli::try_parse_from(["intake", "check"]).is_err());
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["intake", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { port: Some(9000), .. }));
    }
}
