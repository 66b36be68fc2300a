//! dbcutover library root.
//! Exposes the CLI parser, the high-level run() function, and the two
//! pipelines (schema migrations, CSV import) behind a transactional session.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Migrate { .. } => cli::commands::migrate::handle(&cli.command, cfg),
        Commands::Import { .. } => cli::commands::import::handle(&cli.command, cfg),
        Commands::Verify => cli::commands::verify::handle(cfg),
        Commands::Config => cli::commands::config::handle(cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ build the configuration once: file < $DATABASE_URL < flags
    let mut cfg = Config::load(cli.config.as_deref())?
        .with_env_url(std::env::var("DATABASE_URL").ok());

    if let Some(url) = &cli.database_url {
        cfg.database_url = Some(url.clone());
    }

    // 3️⃣ hand it to the dispatcher
    dispatch(&cli, &cfg)
}
