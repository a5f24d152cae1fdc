//! CLI command implementations
//!
//! Every command except `init` follows the same boot sequence:
//! 1. Configuration load
//! 2. Log level applied
//! 3. Schema directory loaded into the registry
//!
//! A failure at any step is fatal.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::boundary::{Boundary, ValidationRejection, LATEST};
use crate::http_server::schema_routes::SchemaSummary;
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::pipeline::{validate_async, ValidationResult};
use crate::schema::{FieldSpec, Schema, SchemaRegistry};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_payload, write_json};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Check {
            config,
            schema,
            version,
            input,
        } => check(&config, &schema, version.as_deref(), input.as_deref()),
        Command::Schemas { config } => schemas(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write a default configuration (if absent) and an example schema.
///
/// Fails if the schema directory already holds schemas.
pub fn init(config_path: &Path) -> CliResult<()> {
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Config::default())?;
        fs::write(config_path, content).map_err(|e| {
            CliError::config_error(format!(
                "Failed to write config {}: {}",
                config_path.display(),
                e
            ))
        })?;
    }

    let config = Config::load(config_path)?;
    let schema_dir = config.schema_path(config_path);

    let mut registry = SchemaRegistry::new(schema_dir.clone());
    if registry.load_all()? > 0 {
        return Err(CliError::already_initialized(schema_dir.display()));
    }

    let example = example_schema()?;
    let file = schema_dir.join(format!(
        "{}_{}.json",
        example.schema_id, example.schema_version
    ));
    fs::write(&file, serde_json::to_string_pretty(&example)?)?;

    write_json(&json!({
        "initialized": true,
        "config": config_path.display().to_string(),
        "schema": file.display().to_string(),
    }))
}

/// Validate one payload and print the outcome.
///
/// A rejected payload prints the rejection body and returns an error so the
/// process exits non-zero.
pub fn check(
    config_path: &Path,
    schema_id: &str,
    schema_version: Option<&str>,
    input: Option<&Path>,
) -> CliResult<()> {
    let (_, boundary) = boot(config_path)?;

    let schema = boundary
        .schema(schema_id, schema_version.unwrap_or(LATEST))
        .map_err(|_| CliError::unknown_schema(schema_id, schema_version))?;

    let payload = read_payload(input)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;
    let result = runtime.block_on(validate_async(&schema, &payload));

    let issue_count = result.issues().len().to_string();
    log_event_with_fields(
        Event::CheckComplete,
        &[
            ("schema_id", schema.schema_id.as_str()),
            ("schema_version", schema.schema_version.as_str()),
            ("issue_count", issue_count.as_str()),
        ],
    );

    match result {
        ValidationResult::Success { value } => write_json(&json!({
            "valid": true,
            "schema_id": schema.schema_id,
            "schema_version": schema.schema_version,
            "value": value.to_json(),
        })),
        ValidationResult::Failure { issues } => {
            let rejection =
                ValidationRejection::from_issues(&issues, boundary.exposes_all_issues());
            write_json(&json!({
                "valid": false,
                "schema_id": schema.schema_id,
                "schema_version": schema.schema_version,
                "rejection": rejection,
            }))?;
            Err(CliError::validation_failed(issues.len()))
        }
    }
}

/// List registered schemas
pub fn schemas(config_path: &Path) -> CliResult<()> {
    let (_, boundary) = boot(config_path)?;

    let summaries: Vec<SchemaSummary> = boundary
        .registry()
        .list()
        .iter()
        .map(|schema| SchemaSummary::from(schema.as_ref()))
        .collect();

    write_json(&summaries)
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let (config, boundary) = boot(config_path)?;

    let mut http_config = config.http;
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::with_config(http_config, boundary);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::server_failed(format!("Failed to create tokio runtime: {}", e)))?;

    runtime.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::server_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Loads config and schemas into a ready boundary
fn boot(config_path: &Path) -> CliResult<(Config, Boundary)> {
    log_event(Event::BootStart);

    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    let config_display = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", config_display.as_str())]);

    let schema_dir = config.schema_path(config_path);
    let mut registry = SchemaRegistry::new(schema_dir.clone());
    let loaded = registry.load_all().map_err(|e| {
        let reason = e.to_string();
        log_event_with_fields(
            Event::SchemaLoadFailed,
            &[("code", e.code()), ("reason", reason.as_str())],
        );
        CliError::from(e)
    })?;

    let count = loaded.to_string();
    let dir = schema_dir.display().to_string();
    log_event_with_fields(
        Event::SchemasLoaded,
        &[("count", count.as_str()), ("schema_dir", dir.as_str())],
    );

    let boundary = Boundary::new(Arc::new(registry)).expose_all_issues(config.expose_all_issues);
    Ok((config, boundary))
}

/// Schema written by `init` as a starting point
fn example_schema() -> CliResult<Schema> {
    let schema = Schema::builder("contact", "1")
        .description("Contact form submission")
        .field(FieldSpec::string("email").trim().lowercase().email())
        .field(
            FieldSpec::string("name")
                .trim()
                .min_length(2)
                .max_length(100),
        )
        .field(FieldSpec::integer("age").optional().coerce().min(0.0).max(150.0))
        .field(
            FieldSpec::boolean("subscribed")
                .coerce()
                .default_value(json!(false)),
        )
        .build()?;
    Ok(schema)
}
