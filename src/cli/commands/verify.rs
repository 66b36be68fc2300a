use crate::config::Config;
use crate::core::verify::{count_rows, render};
use crate::db::connect::open_session;
use crate::db::session::run_read_only;
use crate::errors::AppResult;
use crate::ui::messages::header;

/// Handle the `verify` command
pub fn handle(cfg: &Config) -> AppResult<()> {
    let url = cfg.database_url()?;
    let session = open_session(&url)?;

    let counts = run_read_only(session, |s| count_rows(s))?;

    header("🔎 Target row counts");
    print!("{}", render(&counts));
    Ok(())
}
