use crate::config::Config;
use crate::errors::AppResult;

/// Handle the `config` command
pub fn handle(cfg: &Config) -> AppResult<()> {
    println!("📄 Effective configuration:\n");
    println!("{}", cfg.to_redacted_yaml()?);
    Ok(())
}
