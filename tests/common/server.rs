//! Spawning and tearing down servers under test
//!
//! Each test gets an isolated server with its own catalog and user
//! databases, talking to its own fake upstream.

use super::constants::*;
use super::fake_deezer::FakeDeezer;
use super::fixtures::{create_test_catalog, create_test_db_with_users};
use playpod_catalog_server::catalog_store::SqliteCatalogStore;
use playpod_catalog_server::deezer::DeezerClient;
use playpod_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use playpod_catalog_server::user::{FullUserStore, SqliteUserStore, TokenSigner, UserManager};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn bind_loopback() -> (TcpListener, u16) {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("Cannot bind a loopback port");
    let port = listener.local_addr().expect("Bound socket has no address").port();
    (listener, port)
}

/// A running server on its own port and databases. Dropping it stops the
/// server and removes the temporary files.
pub struct TestServer {
    pub base_url: String,
    pub port: u16,
    /// Same database the server uses, for arranging and checking state
    pub user_store: Arc<dyn FullUserStore>,
    /// None when spawned with an unreachable upstream
    pub deezer: Option<FakeDeezer>,

    stop: Option<oneshot::Sender<()>>,
    _dirs: [TempDir; 2],
}

impl TestServer {
    /// Starts a server backed by a fresh [`FakeDeezer`]. Panics when the
    /// fixtures or the server cannot be brought up.
    pub async fn spawn() -> Self {
        let deezer = FakeDeezer::spawn().await;
        let upstream_url = deezer.base_url.clone();
        Self::start(&upstream_url, Some(deezer)).await
    }

    /// Starts a server whose upstream refuses connections.
    pub async fn spawn_with_upstream_down() -> Self {
        let (listener, port) = bind_loopback().await;
        drop(listener);
        Self::start(&format!("http://127.0.0.1:{}", port), None).await
    }

    async fn start(upstream_url: &str, deezer: Option<FakeDeezer>) -> Self {
        let (catalog_dir, catalog_db) = create_test_catalog().expect("Catalog fixture failed");
        let (users_dir, users_db) = create_test_db_with_users().expect("User fixture failed");

        let user_store: Arc<dyn FullUserStore> =
            Arc::new(SqliteUserStore::new(&users_db).expect("Cannot open user db"));
        let app = make_app(
            ServerConfig {
                port: 0,
                requests_logging_level: RequestsLoggingLevel::None,
                frontend_dir_path: None,
            },
            Arc::new(SqliteCatalogStore::new(&catalog_db).expect("Cannot open catalog db")),
            Arc::new(UserManager::new(
                user_store.clone(),
                TokenSigner::new(TEST_SECRET_KEY, 30),
            )),
            Arc::new(DeezerClient::new(upstream_url)),
        );

        let (listener, port) = bind_loopback().await;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let stopped = async move {
                let _ = stop_rx.await;
            };
            axum::serve(listener, app)
                .with_graceful_shutdown(stopped)
                .await
                .expect("Server under test crashed");
        });

        let server = TestServer {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            user_store,
            deezer,
            stop: Some(stop_tx),
            _dirs: [catalog_dir, users_dir],
        };
        server.wait_until_serving().await;
        server
    }

    /// The fake upstream. Panics for servers spawned with the upstream down.
    pub fn deezer(&self) -> &FakeDeezer {
        self.deezer
            .as_ref()
            .expect("Server was spawned without a fake upstream")
    }

    async fn wait_until_serving(&self) {
        let client = reqwest::Client::new();
        let home = format!("{}/", self.base_url);
        let poll = async {
            while !matches!(client.get(&home).send().await, Ok(r) if r.status().is_success()) {
                tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
            }
        };
        if tokio::time::timeout(Duration::from_millis(SERVER_READY_TIMEOUT_MS), poll)
            .await
            .is_err()
        {
            panic!("No answer from {} after {}ms", home, SERVER_READY_TIMEOUT_MS);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
