mod file_config;

pub use file_config::{AuthConfig, DeezerConfig, FileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_SECRET_KEY: &str = "playpod_development_secret_key";
pub const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Settings as given on the command line or through the environment, before
/// any config file is applied.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub deezer_base_url: String,
    pub secret_key: String,
    pub token_expire_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub deezer_base_url: String,
    pub secret_key: String,
    pub token_expire_minutes: i64,
}

impl AppConfig {
    /// Merges the command line with an optional config file, field by field,
    /// the file winning. Fails when no usable `db_dir` results or when the
    /// auth settings cannot sign tokens.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .context("db_dir must be specified via --db-dir or in config file")?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let deezer_base_url = file
            .deezer
            .and_then(|deezer| deezer.base_url)
            .unwrap_or_else(|| cli.deezer_base_url.clone());

        let auth = file.auth.unwrap_or_default();
        let secret_key = auth.secret_key.unwrap_or_else(|| cli.secret_key.clone());
        if secret_key.is_empty() {
            bail!("The secret key cannot be empty");
        }
        let token_expire_minutes = auth
            .token_expire_minutes
            .unwrap_or(cli.token_expire_minutes);
        if token_expire_minutes <= 0 {
            bail!(
                "Token expiry must be a positive number of minutes, got {}",
                token_expire_minutes
            );
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            deezer_base_url,
            secret_key,
            token_expire_minutes,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }

    pub fn uses_default_secret_key(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
