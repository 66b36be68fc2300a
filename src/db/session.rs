//! Transactional SQL session contract shared by the importer and the
//! migration runner.
//!
//! A session owns one connection and one open transaction for the duration
//! of a pipeline run. Backends live in `db::sqlite` and `db::mysql`.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use std::fmt;
use thiserror::Error;

/// A typed parameter bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// SQL flavour spoken by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Quote an identifier (table or column name).
    pub fn quote(&self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// The schema object (table, column, index, key) already exists.
    DuplicateObject,
    /// A row violated a unique / foreign-key / not-null / check constraint.
    Constraint,
    Connection,
    Other,
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            SessionErrorKind::DuplicateObject => "duplicate object",
            SessionErrorKind::Constraint => "constraint violation",
            SessionErrorKind::Connection => "connection error",
            SessionErrorKind::Other => "database error",
        };
        write!(f, "{desc}")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct SessionError {
    pub kind: SessionErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Other, message)
    }

    /// True when the failure means "the thing we tried to create is already
    /// there".
    ///
    /// Backends that expose structured codes set `DuplicateObject`. The
    /// substring match is a compatibility shim for drivers that only give us
    /// a message (SQLite reports `table x already exists` as a generic error).
    pub fn is_benign_duplicate(&self) -> bool {
        if self.kind == SessionErrorKind::DuplicateObject {
            return true;
        }
        let msg = self.message.to_lowercase();
        msg.contains("already exists") || msg.contains("duplicate")
    }
}

/// The minimal capability both pipelines need: execute, commit, rollback.
pub trait SqlSession {
    fn dialect(&self) -> Dialect;

    /// Execute one statement with positional parameters, returning the
    /// number of affected rows.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError>;

    /// Run a query returning a single integer (first column of first row).
    fn query_count(&mut self, sql: &str) -> Result<i64, SessionError>;

    fn commit(&mut self) -> Result<(), SessionError>;

    fn rollback(&mut self) -> Result<(), SessionError>;
}

impl<S: SqlSession + ?Sized> SqlSession for Box<S> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError> {
        (**self).execute(sql, params)
    }

    fn query_count(&mut self, sql: &str) -> Result<i64, SessionError> {
        (**self).query_count(sql)
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), SessionError> {
        (**self).rollback()
    }
}

impl<S: SqlSession + ?Sized> SqlSession for &mut S {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError> {
        (**self).execute(sql, params)
    }

    fn query_count(&mut self, sql: &str) -> Result<i64, SessionError> {
        (**self).query_count(sql)
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), SessionError> {
        (**self).rollback()
    }
}

/// Run `work` inside the session's transaction.
///
/// - `Ok`  → commit (a failing commit is fatal and triggers a rollback)
/// - `Err` → rollback, original error returned
///
/// The session is consumed, so the connection is released on every path.
pub fn run_in_session<S, T, F>(mut session: S, work: F) -> AppResult<T>
where
    S: SqlSession,
    F: FnOnce(&mut S) -> AppResult<T>,
{
    match work(&mut session) {
        Ok(value) => match session.commit() {
            Ok(()) => Ok(value),
            Err(e) => {
                rollback_quietly(&mut session);
                Err(AppError::Session(e))
            }
        },
        Err(e) => {
            rollback_quietly(&mut session);
            Err(e)
        }
    }
}

/// Like `run_in_session`, but never commits. Used by read-only commands.
pub fn run_read_only<S, T, F>(mut session: S, work: F) -> AppResult<T>
where
    S: SqlSession,
    F: FnOnce(&mut S) -> AppResult<T>,
{
    let result = work(&mut session);
    rollback_quietly(&mut session);
    result
}

fn rollback_quietly<S: SqlSession>(session: &mut S) {
    if let Err(e) = session.rollback() {
        warning(format!("Rollback failed: {}", e));
    }
}
