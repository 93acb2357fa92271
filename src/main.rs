use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playpod_catalog_server::catalog_store::SqliteCatalogStore;
use playpod_catalog_server::config::{self, DEFAULT_SECRET_KEY, DEFAULT_TOKEN_EXPIRE_MINUTES};
use playpod_catalog_server::deezer::{DeezerClient, DEFAULT_DEEZER_BASE_URL};
use playpod_catalog_server::server::{
    run_server, RequestsLoggingLevel, ServerConfig, DEFAULT_PORT,
};
use playpod_catalog_server::user::{SqliteUserStore, TokenSigner, UserManager};

/// Absolute form of a command line path. Paths that do not exist yet are
/// joined to the working directory instead of canonicalized.
fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
            Err(format!("Cannot resolve '{}': {}", s, err))
        }
        Err(_) if path.is_absolute() => Ok(path),
        Err(_) => std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .map_err(|err| format!("No working directory to resolve '{}': {}", s, err)),
    }
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if path.is_dir() {
        Ok(path)
    } else if path.exists() {
        Err(format!("Not a directory: {}", s))
    } else {
        Err(format!("Directory does not exist: {}", s))
    }
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing the database files (catalog.db, user.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// How much of each request and response to log.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Static frontend served at the root instead of the stats endpoint.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Base URL of the upstream music catalog API.
    #[clap(long, env = "DEEZER_BASE_URL", default_value = DEFAULT_DEEZER_BASE_URL)]
    pub deezer_base_url: String,

    /// Secret used to sign access tokens.
    #[clap(long, env = "SECRET_KEY", default_value = DEFAULT_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Lifetime of issued access tokens, in minutes.
    #[clap(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES", default_value_t = DEFAULT_TOKEN_EXPIRE_MINUTES)]
    pub token_expire_minutes: i64,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            deezer_base_url: args.deezer_base_url.clone(),
            secret_key: args.secret_key.clone(),
            token_expire_minutes: args.token_expire_minutes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);
    info!("  logging_level: {}", app_config.logging_level);
    info!("  deezer_base_url: {}", app_config.deezer_base_url);
    info!("  token_expire_minutes: {}", app_config.token_expire_minutes);
    if app_config.uses_default_secret_key() {
        warn!("Using the development secret key, set SECRET_KEY in production");
    }

    info!(
        "Opening SQLite catalog database at {:?}...",
        app_config.catalog_db_path()
    );
    let catalog_store = Arc::new(SqliteCatalogStore::new(app_config.catalog_db_path())?);

    info!(
        "Opening SQLite user database at {:?}...",
        app_config.user_db_path()
    );
    let user_store = Arc::new(SqliteUserStore::new(app_config.user_db_path())?);
    let token_signer = TokenSigner::new(&app_config.secret_key, app_config.token_expire_minutes);
    let user_manager = Arc::new(UserManager::new(user_store, token_signer));

    let music_provider = Arc::new(DeezerClient::new(&app_config.deezer_base_url));

    info!("Ready to serve at port {}!", app_config.port);
    run_server(
        ServerConfig::from(&app_config),
        catalog_store,
        user_manager,
        music_provider,
    )
    .await
}
