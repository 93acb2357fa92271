use super::RequestsLoggingLevel;
use crate::config::AppConfig;

pub const DEFAULT_PORT: u16 = 3001;

/// What the HTTP layer needs out of [`AppConfig`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Static files served at `/` instead of the stats endpoint
    pub frontend_dir_path: Option<String>,
}

impl From<&AppConfig> for ServerConfig {
    fn from(app_config: &AppConfig) -> Self {
        Self {
            port: app_config.port,
            requests_logging_level: app_config.logging_level.clone(),
            frontend_dir_path: app_config.frontend_dir_path.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            requests_logging_level: RequestsLoggingLevel::default(),
            frontend_dir_path: None,
        }
    }
}
