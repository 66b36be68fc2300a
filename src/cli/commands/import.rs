use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::import_all;
use crate::db::connect::open_session;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};

/// Handle the `import` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        data_dir,
        only,
        report,
    } = cmd
    {
        let mut cfg = cfg.clone();
        if let Some(dir) = data_dir {
            cfg.data_dir = dir.clone();
        }

        let mut sources = cfg.source_set();
        sources.retain_kinds(only);

        // Bad URL aborts before anything is touched.
        let url = cfg.database_url()?;

        header("🚀 Data Import");

        let session = open_session(&url)?;
        let summary = import_all(session, &sources)?;

        info(format!(
            "{} records imported, {} skipped",
            summary.total_imported(),
            summary.total_failures()
        ));
        if summary.total_failures() > 0 {
            warning("Some records were skipped; see the lines marked ✗ above.");
        }

        if let Some(path) = report {
            summary.write_json(path)?;
            info(format!("Report written to {}", path.display()));
        }
    }

    Ok(())
}
