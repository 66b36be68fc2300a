//! Run summaries, printable and serialisable to JSON.

use crate::errors::AppResult;
use crate::models::RecordKind;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    pub record_id: String,
    /// 1-based line in the source file, when the reader knows it.
    pub line: Option<u64>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub kind: RecordKind,
    pub source: Option<PathBuf>,
    pub imported: usize,
    pub failures: Vec<RecordFailure>,
}

impl ClassReport {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            source: None,
            imported: 0,
            failures: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.imported + self.failures.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub started_at: String,
    pub finished_at: Option<String>,
    pub classes: Vec<ClassReport>,
}

impl ImportReport {
    pub fn start() -> Self {
        Self {
            started_at: Local::now().to_rfc3339(),
            finished_at: None,
            classes: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now().to_rfc3339());
    }

    pub fn class(&self, kind: RecordKind) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.kind == kind)
    }

    pub fn total_imported(&self) -> usize {
        self.classes.iter().map(|c| c.imported).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.classes.iter().map(|c| c.failures.len()).sum()
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    pub name: String,
    pub applied: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub scripts: Vec<ScriptReport>,
}

impl MigrationReport {
    pub fn applied(&self) -> usize {
        self.scripts.iter().map(|s| s.applied).sum()
    }

    pub fn skipped(&self) -> usize {
        self.scripts.iter().map(|s| s.skipped).sum()
    }
}
