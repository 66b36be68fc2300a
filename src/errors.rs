//! Unified application error type.
//! All modules (db, core, cli, config) return AppError to keep the error
//! handling consistent. Per-record failures use the narrower types in
//! `models::coercion` and `core::import` and never escape as AppError.

use crate::db::session::SessionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Session(#[from] SessionError),

    #[error("Could not parse DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),

    #[error("Migration {script} failed: {source}")]
    Migration {
        script: String,
        #[source]
        source: SessionError,
    },

    #[error(
        "Migration {script} has {count} statements in one chunk; separate them with the statement breakpoint"
    )]
    UnsplitChunk { script: String, count: usize },

    #[error("Migration directory not found: {0}")]
    MigrationDir(PathBuf),

    #[error("Backup error: {0}")]
    Backup(String),

    // ---------------------------
    // Source data
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Reports
    // ---------------------------
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
