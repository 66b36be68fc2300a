//! Versioned schema scripts.
//!
//! Scripts are `.sql` files whose name starts with a zero-padded version
//! (`0000_init.sql`, `0001_listings.sql`, ...). Each script is cut into
//! statements on a literal marker line; there is no SQL parser, so the marker
//! must not appear inside a statement's own text or comments.

use crate::core::report::{MigrationReport, ScriptReport};
use crate::db::session::{SqlSession, run_in_session};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, header, info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATEMENT_BREAKPOINT: &str = "--> statement-breakpoint";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// Leading digits of the file name.
    pub version: String,
    pub name: String,
    pub path: PathBuf,
}

impl MigrationScript {
    pub fn read(&self) -> AppResult<String> {
        fs::read_to_string(&self.path).map_err(|e| AppError::Open {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// `<digits>...sql`
pub fn is_migration_file(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_digit()) && name.ends_with(".sql")
}

/// List the scripts in `dir`, sorted by file name.
pub fn discover_scripts(dir: &Path) -> AppResult<Vec<MigrationScript>> {
    if !dir.is_dir() {
        return Err(AppError::MigrationDir(dir.to_path_buf()));
    }

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !is_migration_file(&name) {
            continue;
        }

        let version = name.chars().take_while(|c| c.is_ascii_digit()).collect();
        scripts.push(MigrationScript {
            version,
            name,
            path: entry.path(),
        });
    }

    scripts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scripts)
}

/// Cut `text` on `marker`, trimming each piece and dropping empty ones.
pub fn split_statements<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    text.split(marker)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Count the statements in one chunk the way the server would cut it.
///
/// Semicolons inside quotes, comments and trigger bodies do not end a
/// statement. A chunk holding only comments counts as zero. Backslash
/// escapes inside quoted strings follow MySQL.
pub fn count_statements(chunk: &str) -> usize {
    let mut count = 0;
    let mut pending = false;
    let mut words: Vec<String> = Vec::new();
    let mut chars = chunk.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                pending = true;
                words.push(String::new());
                while let Some(q) = chars.next() {
                    if q == '\\' && c != '`' {
                        chars.next();
                    } else if q == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            ';' if !pending => {}
            ';' if !is_trigger(&words) || words.last().is_some_and(|w| w == "END") => {
                count += 1;
                pending = false;
                words.clear();
            }
            c if c.is_whitespace() => {}
            c if c.is_alphanumeric() || c == '_' => {
                pending = true;
                let mut word = c.to_string();
                while let Some(&n) = chars.peek() {
                    if !(n.is_alphanumeric() || n == '_') {
                        break;
                    }
                    word.push(n);
                    chars.next();
                }
                words.push(word.to_ascii_uppercase());
            }
            other => {
                pending = true;
                words.push(other.to_string());
            }
        }
    }

    if pending {
        count += 1;
    }
    count
}

/// `CREATE [TEMP | DEFINER=...] TRIGGER`: the body ends at `END;`.
fn is_trigger(words: &[String]) -> bool {
    words.first().is_some_and(|w| w == "CREATE") && words.iter().take(8).any(|w| w == "TRIGGER")
}

/// Execute one script's statements in order.
///
/// "Already exists" failures are skipped; any other failure aborts. A chunk
/// holding more than one statement aborts before it runs, since a backend
/// would stop at the first failing statement and drop the rest.
pub fn apply_script<S: SqlSession + ?Sized>(
    session: &mut S,
    name: &str,
    text: &str,
    marker: &str,
) -> AppResult<ScriptReport> {
    info(format!("  Running: {}", name));

    let mut report = ScriptReport {
        name: name.to_string(),
        ..Default::default()
    };

    for statement in split_statements(text, marker) {
        let found = count_statements(statement);
        if found > 1 {
            error(format!(
                "    ✗ {} statements without a breakpoint: {}",
                found,
                preview(statement)
            ));
            return Err(AppError::UnsplitChunk {
                script: name.to_string(),
                count: found,
            });
        }

        match session.execute(statement, &[]) {
            Ok(_) => report.applied += 1,
            Err(e) if e.is_benign_duplicate() => {
                warning(format!("    Skipping (already exists): {}", preview(statement)));
                report.skipped += 1;
            }
            Err(e) => {
                error(format!("    ✗ Error: {}", e));
                return Err(AppError::Migration {
                    script: name.to_string(),
                    source: e,
                });
            }
        }
    }

    Ok(report)
}

/// Apply every script in `dir` on an open session, without committing.
pub fn apply_migrations<S: SqlSession + ?Sized>(
    session: &mut S,
    dir: &Path,
    marker: &str,
) -> AppResult<MigrationReport> {
    let scripts = discover_scripts(dir)?;
    info(format!("📋 Found {} migration files", scripts.len()));

    let mut report = MigrationReport::default();
    for script in &scripts {
        let text = script.read()?;
        report
            .scripts
            .push(apply_script(session, &script.name, &text, marker)?);
    }
    Ok(report)
}

/// Apply every script in `dir` and commit.
///
/// The session is consumed: committed when all scripts succeed, rolled back
/// on the first fatal error.
pub fn run_migrations<S: SqlSession>(
    session: S,
    dir: &Path,
    marker: &str,
) -> AppResult<MigrationReport> {
    header("🔧 Running Database Migrations");

    let report = run_in_session(session, |s| apply_migrations(s, dir, marker))?;

    success(format!(
        "Migrations completed successfully! ({} applied, {} skipped)",
        report.applied(),
        report.skipped()
    ));
    Ok(report)
}

/// What `run_migrations` would execute, without touching a database.
pub fn plan_migrations(dir: &Path, marker: &str) -> AppResult<Vec<(MigrationScript, usize)>> {
    let mut plan = Vec::new();
    for script in discover_scripts(dir)? {
        let statements = split_statements(&script.read()?, marker).len();
        plan.push((script, statements));
    }
    Ok(plan)
}

/// First line of a statement, shortened for log output.
fn preview(statement: &str) -> String {
    let line = statement.lines().next().unwrap_or_default();
    if line.chars().count() > 72 {
        let cut: String = line.chars().take(72).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
