use crate::models::RecordKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for dbcutover
/// Apply schema scripts and import CSV exports into a live database
#[derive(Parser)]
#[command(
    name = "dbcutover",
    version = env!("CARGO_PKG_VERSION"),
    about = "Apply versioned schema scripts and import CSV exports into a live database",
    long_about = None
)]
pub struct Cli {
    /// YAML configuration file (default: ./dbcutover.yaml when present)
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target database, overrides config and $DATABASE_URL
    #[arg(global = true, long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply the schema scripts in version order
    Migrate {
        #[arg(long = "dir", value_name = "DIR", help = "Directory holding the NNNN_*.sql scripts")]
        dir: Option<String>,

        #[arg(long = "dry-run", help = "List scripts and statement counts without connecting")]
        dry_run: bool,

        #[arg(long = "backup", help = "Zip a SQLite target before applying scripts")]
        backup: bool,
    },

    /// Import the CSV exports (users, seller profiles, listings, settings)
    Import {
        #[arg(long = "data-dir", value_name = "DIR", help = "Directory holding the CSV exports")]
        data_dir: Option<String>,

        #[arg(
            long = "only",
            value_enum,
            value_delimiter = ',',
            help = "Restrict to these record classes (still imported in dependency order)"
        )]
        only: Vec<RecordKind>,

        #[arg(long = "report", value_name = "FILE", help = "Write a JSON summary of the run")]
        report: Option<PathBuf>,
    },

    /// Print row counts of the target tables
    Verify,

    /// Print the effective configuration (password masked)
    Config,
}
