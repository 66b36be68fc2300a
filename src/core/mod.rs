pub mod import;
pub mod migrate;
pub mod report;
pub mod upsert;
pub mod verify;
