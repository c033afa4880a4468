//! CLI argument definitions using clap
//!
//! Commands:
//! - tabingest serve [--host <host>] [--port <port>]
//! - tabingest backup <table>
//! - tabingest restore <table>
//! - tabingest tables

use clap::{Parser, Subcommand};

/// tabingest - validated CSV ingest with Avro backups
#[derive(Parser, Debug)]
#[command(name = "tabingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Override INGEST_HOST
        #[arg(long)]
        host: Option<String>,

        /// Override INGEST_PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a backup of one table and exit
    Backup {
        /// Registered table name
        table: String,
    },

    /// Read back the newest backup of one table and exit
    Restore {
        /// Registered table name
        table: String,
    },

    /// Print the registered table schemas
    Tables,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
