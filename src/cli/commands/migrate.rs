use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::migrate::{plan_migrations, run_migrations};
use crate::db::backup::backup_before_migration;
use crate::db::connect::open_session;
use crate::db::url::DatabaseUrl;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::path::expand_tilde;

/// Handle the `migrate` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Migrate {
        dir,
        dry_run,
        backup,
    } = cmd
    {
        let dir = dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| cfg.migrations_path());
        let marker = cfg.statement_breakpoint.as_str();

        //
        // 1) DRY RUN: no database involved
        //
        if *dry_run {
            header("📋 Migration plan");
            let plan = plan_migrations(&dir, marker)?;
            for (script, statements) in &plan {
                println!(
                    "  {:<8} {:<48} {} statement(s)",
                    script.version, script.name, statements
                );
            }
            info(format!("{} migration files in {}", plan.len(), dir.display()));
            return Ok(());
        }

        // Bad URL aborts before anything is touched.
        let url = cfg.database_url()?;

        //
        // 2) OPTIONAL BACKUP
        //
        if *backup {
            match &url {
                DatabaseUrl::Sqlite(path) => {
                    if backup_before_migration(path)?.is_none() {
                        info("Database file does not exist yet, backup skipped.");
                    }
                }
                DatabaseUrl::Server(_) => {
                    warning("--backup only applies to SQLite targets, skipped.");
                }
            }
        }

        //
        // 3) APPLY
        //
        let session = open_session(&url)?;
        run_migrations(session, &dir, marker)?;
    }

    Ok(())
}
