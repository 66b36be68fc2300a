//! Resolve a `DatabaseUrl` into a live session.

use crate::db::session::SqlSession;
use crate::db::sqlite::SqliteSession;
use crate::db::url::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

/// Open a transactional session on the target database.
pub fn open_session(url: &DatabaseUrl) -> AppResult<Box<dyn SqlSession>> {
    let session: Box<dyn SqlSession> = match url {
        DatabaseUrl::Sqlite(path) => Box::new(SqliteSession::open(path)?),
        DatabaseUrl::Server(desc) => match desc.scheme.as_str() {
            "mysql" | "mariadb" | "tidb" => open_mysql(desc)?,
            other => return Err(AppError::UnsupportedBackend(other.to_string())),
        },
    };

    success(format!("Connected to database: {}", url));
    Ok(session)
}

#[cfg(feature = "mysql")]
fn open_mysql(desc: &crate::db::url::ConnectionDescriptor) -> AppResult<Box<dyn SqlSession>> {
    Ok(Box::new(crate::db::mysql::MySqlSession::connect(desc)?))
}

#[cfg(not(feature = "mysql"))]
fn open_mysql(desc: &crate::db::url::ConnectionDescriptor) -> AppResult<Box<dyn SqlSession>> {
    Err(AppError::UnsupportedBackend(format!(
        "{} (rebuild with `--features mysql`)",
        desc.scheme
    )))
}
