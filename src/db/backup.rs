//! Safety backup of a SQLite target before schema changes.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::Local;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip the database file next to itself and return the archive path.
///
/// A missing database file is not an error: there is nothing to protect yet,
/// and `None` is returned.
pub fn backup_before_migration(db_path: &Path) -> AppResult<Option<PathBuf>> {
    if !db_path.exists() {
        return Ok(None);
    }

    let file_name = db_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Backup(format!("not a file: {}", db_path.display())))?;

    let backup_name = format!(
        "{}-{}-pre-migration.zip",
        Local::now().format("%Y%m%d_%H%M%S"),
        file_name
    );
    let backup_path = db_path.with_file_name(backup_name);

    let file = File::create(&backup_path).map_err(|e| AppError::Open {
        path: backup_path.clone(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(file_name, options)
        .map_err(|e| AppError::Backup(format!("start_file: {}", e)))?;

    let mut src = File::open(db_path).map_err(|e| AppError::Open {
        path: db_path.to_path_buf(),
        source: e,
    })?;
    io::copy(&mut src, &mut zip)?;

    zip.finish()
        .map_err(|e| AppError::Backup(format!("finish: {}", e)))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(Some(backup_path))
}
