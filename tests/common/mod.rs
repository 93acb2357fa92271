//! Shared harness for the end-to-end suites
//!
//! A suite spawns a [`TestServer`], which owns temporary catalog and user
//! databases plus a [`FakeDeezer`] upstream, then talks to it through a
//! [`TestClient`]. Suites go through these re-exports only.
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer, TRACK_1_ID};
//!
//! #[tokio::test]
//! async fn fetches_a_seeded_track() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::authenticated(server.base_url.clone()).await;
//!     assert!(client.get_track(TRACK_1_ID).await.status().is_success());
//! }
//! ```

#![allow(dead_code)]

mod client;
mod constants;
mod fake_deezer;
mod fixtures;
mod server;

pub use client::TestClient;
pub use constants::*;
pub use fake_deezer::FakeDeezer;
pub use server::TestServer;
