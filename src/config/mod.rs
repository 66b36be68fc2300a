//! Run configuration.
//!
//! Built once at startup from defaults, an optional YAML file, the
//! `DATABASE_URL` environment value and CLI flags (later wins), then passed
//! explicitly to the pipelines.

use crate::core::import::SourceSet;
use crate::core::migrate::STATEMENT_BREAKPOINT;
use crate::db::url::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use crate::models::RecordKind;
use crate::utils::path::{expand_tilde, resolve};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "dbcutover.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
    #[serde(default = "default_breakpoint")]
    pub statement_breakpoint: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub sources: SourceFiles,
}

/// CSV file name per record class, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFiles {
    #[serde(default = "default_accounts")]
    pub accounts: String,
    #[serde(default = "default_seller_profiles")]
    pub seller_profiles: String,
    #[serde(default = "default_listings")]
    pub listings: String,
    #[serde(default = "default_settings")]
    pub settings: String,
}

fn default_migrations_dir() -> String {
    "drizzle".to_string()
}
fn default_breakpoint() -> String {
    STATEMENT_BREAKPOINT.to_string()
}
fn default_data_dir() -> String {
    ".".to_string()
}
fn default_accounts() -> String {
    "users.csv".to_string()
}
fn default_seller_profiles() -> String {
    "sellerProfiles.csv".to_string()
}
fn default_listings() -> String {
    "listings.csv".to_string()
}
fn default_settings() -> String {
    "systemSettings.csv".to_string()
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            seller_profiles: default_seller_profiles(),
            listings: default_listings(),
            settings: default_settings(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            migrations_dir: default_migrations_dir(),
            statement_breakpoint: default_breakpoint(),
            data_dir: default_data_dir(),
            sources: SourceFiles::default(),
        }
    }
}

impl Config {
    /// Load `path` if given (it must exist), else `dbcutover.yaml` from the
    /// working directory if present, else defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(AppError::Config(format!(
                    "configuration file not found: {}",
                    p.display()
                )));
            }
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| AppError::Open {
            path: path.clone(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply the `DATABASE_URL` environment value, if any.
    pub fn with_env_url(mut self, env_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.database_url = Some(url);
        }
        self
    }

    pub fn database_url(&self) -> AppResult<DatabaseUrl> {
        match self.database_url.as_deref() {
            Some(url) => DatabaseUrl::parse(url),
            None => Err(AppError::InvalidDatabaseUrl(
                "DATABASE_URL is not set".to_string(),
            )),
        }
    }

    pub fn migrations_path(&self) -> PathBuf {
        expand_tilde(&self.migrations_dir)
    }

    pub fn source_file(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Accounts => &self.sources.accounts,
            RecordKind::SellerProfiles => &self.sources.seller_profiles,
            RecordKind::Listings => &self.sources.listings,
            RecordKind::Settings => &self.sources.settings,
        }
    }

    /// Source paths for every record class, resolved against `data_dir`.
    pub fn source_set(&self) -> SourceSet {
        let base = expand_tilde(&self.data_dir);
        RecordKind::ORDER
            .into_iter()
            .fold(SourceSet::new(), |set, kind| {
                set.with(kind, resolve(&base, self.source_file(kind)))
            })
    }

    /// YAML dump with the password in `database_url` masked.
    pub fn to_redacted_yaml(&self) -> AppResult<String> {
        let mut shown = self.clone();
        if let Some(url) = &self.database_url {
            shown.database_url = Some(match DatabaseUrl::parse(url) {
                Ok(parsed) => parsed.to_string(),
                Err(_) => "<invalid>".to_string(),
            });
        }
        Ok(serde_yaml::to_string(&shown)?)
    }
}
