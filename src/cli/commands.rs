//! CLI command implementations
//!
//! Every command reads [`IngestConfig`] from the environment and opens the
//! service the same way the server does, so a one-shot backup sees exactly
//! the tables and directories the server uses.

use std::sync::Arc;

use serde::Serialize;

use crate::config::IngestConfig;
use crate::http_server::HttpServer;
use crate::ingest::{IngestError, IngestService};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::TableSchema;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let config = load_config()?;
    match cmd {
        Command::Serve { host, port } => serve(config, host, port),
        Command::Backup { table } => backup(&config, &table),
        Command::Restore { table } => restore(&config, &table),
        Command::Tables => tables(&config),
    }
}

fn load_config() -> CliResult<IngestConfig> {
    let config = IngestConfig::from_env().map_err(|e| {
        let message = e.to_string();
        log_event_with_fields(Event::StartupFailed, &[("reason", message.as_str())]);
        CliError::from(e)
    })?;

    let upload_dir = config.upload_dir.display().to_string();
    let backup_dir = config.backup_dir.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("upload_dir", upload_dir.as_str()),
            ("backup_dir", backup_dir.as_str()),
        ],
    );
    Ok(config)
}

fn boot_failed(e: IngestError) -> CliError {
    let message = e.to_string();
    log_event_with_fields(Event::StartupFailed, &[("reason", message.as_str())]);
    CliError::boot_failed(message)
}

fn open_service(config: &IngestConfig) -> CliResult<IngestService> {
    IngestService::open(config).map_err(boot_failed)
}

/// Open the service for a one-shot command on `table`.
///
/// The table name is checked against the registry before the store or
/// any blob directory is opened.
fn open_for_table(config: &IngestConfig, table: &str) -> CliResult<IngestService> {
    let registry = IngestService::load_registry(config).map_err(boot_failed)?;
    registry.require(table).map_err(IngestError::from)?;
    IngestService::open_with_registry(config, registry).map_err(boot_failed)
}

/// Start the HTTP server and block until it stops
pub fn serve(mut config: IngestConfig, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    let service = Arc::new(open_service(&config)?);
    let server = HttpServer::with_service(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Back up one table and print the report
pub fn backup(config: &IngestConfig, table: &str) -> CliResult<()> {
    let service = open_for_table(config, table)?;
    let report = service.backup(table)?;
    write_response(&report)
}

/// Read back the newest backup of one table and print the report
pub fn restore(config: &IngestConfig, table: &str) -> CliResult<()> {
    let service = open_for_table(config, table)?;
    let report = service.restore(table)?;
    write_response(&report)
}

#[derive(Serialize)]
struct TablesOutput<'a> {
    tables: Vec<&'a TableSchema>,
}

/// Print the registered table schemas
pub fn tables(config: &IngestConfig) -> CliResult<()> {
    let registry = IngestService::load_registry(config).map_err(boot_failed)?;
    let output = TablesOutput {
        tables: registry.tables().collect(),
    };
    write_response(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use crate::config::HttpConfig;
    use crate::store::IN_MEMORY;
    use std::path::Path;

    fn config(dir: &Path) -> IngestConfig {
        IngestConfig {
            database_url: IN_MEMORY.to_string(),
            upload_dir: dir.join("uploads"),
            backup_dir: dir.join("backups"),
            schema_file: None,
            http: HttpConfig::default(),
        }
    }

    #[test]
    fn test_unknown_table_opens_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let err = backup(&config, "salaries").unwrap_err();
        assert_eq!(err.code(), CliErrorCode::CommandFailed);
        assert_eq!(err.message(), "Unknown table: salaries");

        let err = restore(&config, "salaries").unwrap_err();
        assert_eq!(err.message(), "Unknown table: salaries");

        assert!(!config.upload_dir.exists());
        assert!(!config.backup_dir.exists());
    }

    #[test]
    fn test_known_table_opens_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let service = open_for_table(&config, "jobs").unwrap();
        assert!(service.registry().contains("jobs"));
        assert!(config.upload_dir.is_dir());
        assert!(config.backup_dir.is_dir());
    }

    #[test]
    fn test_missing_schema_file_is_boot_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.schema_file = Some(dir.path().join("absent.json"));

        let err = open_for_table(&config, "jobs").err().unwrap();
        assert_eq!(err.code(), CliErrorCode::BootFailed);
        assert!(!config.upload_dir.exists());
    }
}
