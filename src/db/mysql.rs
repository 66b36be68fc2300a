//! MySQL / TiDB session backed by mysql_async.
//!
//! mysql_async is async-only, the pipelines are not: every call is driven to
//! completion on a private current-thread tokio runtime owned by the session.

use crate::db::session::{Dialect, SessionError, SessionErrorKind, SqlSession, SqlValue};
use crate::db::url::ConnectionDescriptor;
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Params, SslOpts, Value};
use tokio::runtime::{Builder, Runtime};

// Server error codes that mean "object already exists".
const ER_DUP_KEY: u16 = 1022;
const ER_TABLE_EXISTS_ERROR: u16 = 1050;
const ER_DUP_FIELDNAME: u16 = 1060;
const ER_DUP_KEYNAME: u16 = 1061;
const ER_DUP_ENTRY: u16 = 1062;
const ER_FK_DUP_NAME: u16 = 1826;

// Constraint failures on a single row.
const ER_BAD_NULL_ERROR: u16 = 1048;
const ER_NO_REFERENCED_ROW_2: u16 = 1452;
const ER_CHECK_CONSTRAINT_VIOLATED: u16 = 3819;

/// Map a server error code to the kind the pipelines act on.
pub fn error_kind(code: u16) -> SessionErrorKind {
    match code {
        ER_DUP_KEY | ER_TABLE_EXISTS_ERROR | ER_DUP_FIELDNAME | ER_DUP_KEYNAME | ER_DUP_ENTRY
        | ER_FK_DUP_NAME => SessionErrorKind::DuplicateObject,
        ER_BAD_NULL_ERROR | ER_NO_REFERENCED_ROW_2 | ER_CHECK_CONSTRAINT_VIOLATED => {
            SessionErrorKind::Constraint
        }
        _ => SessionErrorKind::Other,
    }
}

fn classify(e: mysql_async::Error) -> SessionError {
    let kind = match &e {
        mysql_async::Error::Server(server) => error_kind(server.code),
        mysql_async::Error::Io(_) => SessionErrorKind::Connection,
        _ => SessionErrorKind::Other,
    };
    SessionError::new(kind, e.to_string())
}

fn to_mysql(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::NULL,
        SqlValue::Int(v) => Value::Int(*v),
        SqlValue::Float(v) => Value::Double(*v),
        SqlValue::Bool(v) => Value::Int(i64::from(*v)),
        SqlValue::Text(v) => Value::Bytes(v.as_bytes().to_vec()),
    }
}

pub struct MySqlSession {
    runtime: Runtime,
    conn: Option<Conn>,
    in_transaction: bool,
}

impl MySqlSession {
    /// Connect with the given descriptor and start a transaction.
    pub fn connect(desc: &ConnectionDescriptor) -> Result<Self, SessionError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SessionError::new(SessionErrorKind::Connection, e.to_string()))?;

        let mut builder = OptsBuilder::default()
            .ip_or_hostname(desc.host.clone())
            .tcp_port(desc.port)
            .user(Some(desc.user.clone()))
            .pass(Some(desc.password.clone()))
            .db_name(Some(desc.database.clone()));
        if desc.tls {
            builder = builder.ssl_opts(SslOpts::default());
        }
        let opts: Opts = builder.into();

        let conn = runtime.block_on(async move {
            let mut conn = Conn::new(opts).await?;
            conn.query_drop("START TRANSACTION").await?;
            Ok::<Conn, mysql_async::Error>(conn)
        });
        let conn = conn.map_err(|e| {
            let mut err = classify(e);
            err.kind = SessionErrorKind::Connection;
            err
        })?;

        Ok(Self {
            runtime,
            conn: Some(conn),
            in_transaction: true,
        })
    }

    fn conn(&mut self) -> Result<(&Runtime, &mut Conn), SessionError> {
        match self.conn.as_mut() {
            Some(conn) => Ok((&self.runtime, conn)),
            None => Err(SessionError::new(
                SessionErrorKind::Connection,
                "connection already closed",
            )),
        }
    }
}

impl SqlSession for MySqlSession {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError> {
        let (rt, conn) = self.conn()?;
        rt.block_on(async {
            if params.is_empty() {
                conn.query_drop(sql).await?;
            } else {
                let values = params.iter().map(to_mysql).collect::<Vec<_>>();
                conn.exec_drop(sql, Params::Positional(values)).await?;
            }
            Ok::<u64, mysql_async::Error>(conn.affected_rows())
        })
        .map_err(classify)
    }

    fn query_count(&mut self, sql: &str) -> Result<i64, SessionError> {
        let (rt, conn) = self.conn()?;
        let n: Option<i64> = rt.block_on(conn.query_first(sql)).map_err(classify)?;
        Ok(n.unwrap_or(0))
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        if self.in_transaction {
            let (rt, conn) = self.conn()?;
            rt.block_on(conn.query_drop("COMMIT")).map_err(classify)?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SessionError> {
        if self.in_transaction {
            self.in_transaction = false;
            let (rt, conn) = self.conn()?;
            rt.block_on(conn.query_drop("ROLLBACK")).map_err(classify)?;
        }
        Ok(())
    }
}

impl Drop for MySqlSession {
    fn drop(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            let in_transaction = self.in_transaction;
            self.runtime.block_on(async move {
                if in_transaction {
                    let _ = conn.query_drop("ROLLBACK").await;
                }
                let _ = conn.disconnect().await;
            });
        }
    }
}
