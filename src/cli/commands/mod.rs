pub mod config;
pub mod import;
pub mod migrate;
pub mod verify;
