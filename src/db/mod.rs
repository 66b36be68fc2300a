pub mod backup;
pub mod connect;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod session;
pub mod sqlite;
pub mod url;
