use anyhow::{Context, Result};
use std::time::Duration;

use axum::{extract::State, middleware, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use super::response::Envelope;
use super::{
    log_requests, make_account_routes, make_catalog_routes, make_deezer_routes,
    make_user_content_routes, state::*, ServerConfig,
};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> Envelope<ServerStats> {
    Envelope::success(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    })
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    user_manager: GuardedUserManager,
    music_provider: GuardedMusicProvider,
) -> Router {
    let state = ServerState::new(config.clone(), catalog_store, user_manager, music_provider);

    let api_routes: Router = make_catalog_routes(state.clone())
        .merge(make_account_routes(state.clone()))
        .merge(make_user_content_routes(state.clone()))
        .nest("/deezer", make_deezer_routes(state.clone()));

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api", api_routes)
        .merge(make_user_content_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    user_manager: GuardedUserManager,
    music_provider: GuardedMusicProvider,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store, user_manager, music_provider);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
