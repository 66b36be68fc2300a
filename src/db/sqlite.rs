//! SQLite session backed by rusqlite.

use crate::db::session::{Dialect, SessionError, SessionErrorKind, SqlSession, SqlValue};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, ErrorCode, ToSql, params_from_iter};
use std::path::Path;

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Int(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            SqlValue::Bool(v) => ToSqlOutput::Owned(Value::Integer(i64::from(*v))),
            SqlValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(e: rusqlite::Error) -> Self {
        let kind = match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => SessionErrorKind::Constraint,
            Some(ErrorCode::CannotOpen) | Some(ErrorCode::NotADatabase) => {
                SessionErrorKind::Connection
            }
            _ => SessionErrorKind::Other,
        };
        SessionError::new(kind, e.to_string())
    }
}

pub struct SqliteSession {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteSession {
    /// Open (or create) the database file and start a transaction.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let conn = Connection::open(path).map_err(|e| {
            SessionError::new(SessionErrorKind::Connection, e.to_string())
        })?;
        Self::from_connection(conn)
    }

    /// Wrap an already open connection (e.g. an in-memory database).
    pub fn from_connection(conn: Connection) -> Result<Self, SessionError> {
        conn.execute_batch("PRAGMA foreign_keys = ON; BEGIN;")?;
        Ok(Self {
            conn,
            in_transaction: true,
        })
    }
}

impl SqlSession for SqliteSession {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError> {
        if params.is_empty() {
            // Schema chunks may carry several statements and trailing comments.
            self.conn.execute_batch(sql)?;
            return Ok(self.conn.changes() as u64);
        }

        let mut stmt = self.conn.prepare_cached(sql)?;
        let affected = stmt.execute(params_from_iter(params.iter()))?;
        Ok(affected as u64)
    }

    fn query_count(&mut self, sql: &str) -> Result<i64, SessionError> {
        let n = self.conn.query_row(sql, [], |row| row.get::<_, i64>(0))?;
        Ok(n)
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT;")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SessionError> {
        if self.in_transaction {
            self.in_transaction = false;
            self.conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if self.in_transaction {
            let _ = self.conn.execute_batch("ROLLBACK;");
        }
    }
}
