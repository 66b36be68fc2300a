//! CSV export → typed upserts.
//!
//! Record classes run in `RecordKind::ORDER` inside one transaction. A bad
//! row is reported and skipped; anything that prevents reading a source at
//! all aborts the run and the caller rolls the whole session back.

use crate::core::report::{ClassReport, ImportReport, RecordFailure};
use crate::core::upsert::UpsertStatement;
use crate::db::session::{SessionError, SessionErrorKind, SqlSession, SqlValue, run_in_session};
use crate::errors::{AppError, AppResult};
use crate::models::{CoercionError, RecordClass, RecordKind};
use crate::ui::messages::{error, header, info, success};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single record was not imported.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("{}: {}", .0.kind, .0.message)]
    Session(#[from] SessionError),

    #[error("malformed row: {0}")]
    Malformed(String),
}

/// Source file per record class.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: BTreeMap<RecordKind, PathBuf>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: RecordKind, path: impl Into<PathBuf>) -> Self {
        self.files.insert(kind, path.into());
        self
    }

    pub fn get(&self, kind: RecordKind) -> Option<&Path> {
        self.files.get(&kind).map(PathBuf::as_path)
    }

    /// Keep only the given kinds. An empty filter keeps everything.
    pub fn retain_kinds(&mut self, kinds: &[RecordKind]) {
        if !kinds.is_empty() {
            self.files.retain(|k, _| kinds.contains(k));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Coerce one row into the parameter list of the class upsert.
///
/// `cell` looks a source header up in the current row.
pub fn coerce_row<'a, F>(class: &RecordClass, cell: F) -> Result<Vec<SqlValue>, CoercionError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    class
        .fields
        .iter()
        .map(|f| f.coercion.apply(f.source, cell(f.source)))
        .collect()
}

/// Import every configured source, commit, and return the report.
///
/// The session is consumed: committed on success, rolled back otherwise.
pub fn import_all<S: SqlSession>(session: S, sources: &SourceSet) -> AppResult<ImportReport> {
    let report = run_in_session(session, |s| import_sources(s, sources))?;

    success("Import completed successfully!");
    Ok(report)
}

/// Run each configured class in dependency order on an open session.
pub fn import_sources<S: SqlSession + ?Sized>(
    session: &mut S,
    sources: &SourceSet,
) -> AppResult<ImportReport> {
    let mut report = ImportReport::start();

    for kind in RecordKind::ORDER {
        if let Some(path) = sources.get(kind) {
            let class_report = import_class_file(session, kind.class(), path)?;
            report.classes.push(class_report);
        }
    }

    report.finish();
    Ok(report)
}

/// Open `path` and import it as `class`. Failing to open is fatal.
pub fn import_class_file<S: SqlSession + ?Sized>(
    session: &mut S,
    class: &RecordClass,
    path: &Path,
) -> AppResult<ClassReport> {
    let file = File::open(path).map_err(|e| AppError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut report = import_class(session, class, file)?;
    report.source = Some(path.to_path_buf());
    Ok(report)
}

/// Import one CSV stream as `class`, one upsert per row.
pub fn import_class<S: SqlSession + ?Sized, R: Read>(
    session: &mut S,
    class: &RecordClass,
    reader: R,
) -> AppResult<ClassReport> {
    let kind = class.kind;
    header(format!("📥 Importing {}...", kind));

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let index = header_index(rdr.headers()?);

    let upsert = UpsertStatement::for_class(class, session.dialect());
    let mut report = ClassReport::new(kind);

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(AppError::Csv(e)),
            Err(e) => {
                let failure = RecordFailure {
                    record_id: "unknown".to_string(),
                    line: e.position().map(|p| p.line()),
                    reason: RecordError::Malformed(e.to_string()).to_string(),
                };
                error(format!(
                    "  ✗ Error importing {} {}: {}",
                    kind.label(),
                    failure.record_id,
                    failure.reason
                ));
                report.failures.push(failure);
                continue;
            }
        };

        let record_id = class.record_id(|name| index.get(name).and_then(|&i| record.get(i)));

        match upsert_record(session, class, &upsert, &index, &record) {
            Ok(()) => report.imported += 1,
            // A lost connection fails every later row too.
            Err(RecordError::Session(e)) if e.kind == SessionErrorKind::Connection => {
                error(format!("  ✗ Connection lost while importing {}: {}", kind, e));
                return Err(AppError::Session(e));
            }
            Err(e) => {
                error(format!(
                    "  ✗ Error importing {} {}: {}",
                    kind.label(),
                    record_id,
                    e
                ));
                report.failures.push(RecordFailure {
                    record_id,
                    line: record.position().map(|p| p.line()),
                    reason: e.to_string(),
                });
            }
        }
    }

    success(format!("  ✓ Imported {} {}", report.imported, kind));
    if !report.failures.is_empty() {
        info(format!(
            "  {} of {} {} skipped",
            report.failures.len(),
            report.attempted(),
            kind
        ));
    }

    Ok(report)
}

fn upsert_record<S: SqlSession + ?Sized>(
    session: &mut S,
    class: &RecordClass,
    upsert: &UpsertStatement,
    index: &HashMap<String, usize>,
    record: &StringRecord,
) -> Result<(), RecordError> {
    let params = coerce_row(class, |name| {
        index.get(name).and_then(|&i| record.get(i))
    })?;
    session.execute(&upsert.sql, &params)?;
    Ok(())
}

/// Header name → column position. Names are trimmed and a leading BOM is
/// dropped; the first occurrence of a duplicated header wins.
fn header_index(headers: &StringRecord) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, name) in headers.iter().enumerate() {
        let name = name.trim_start_matches('\u{feff}').trim().to_string();
        index.entry(name).or_insert(i);
    }
    index
}
