mod catalog_routes;
pub mod config;
mod deezer_routes;
mod http_layers;
pub mod response;
pub mod server;
pub(self) mod session;
pub mod state;
mod user_routes;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use http_layers::*;
pub(self) use catalog_routes::make_catalog_routes;
pub(self) use deezer_routes::make_deezer_routes;
pub use server::{make_app, run_server};
pub use session::Session;
pub(self) use user_routes::{make_account_routes, make_user_content_routes};
