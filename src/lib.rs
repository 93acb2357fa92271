//! PlayPod catalog server library.
//!
//! Exposes the stores, the upstream provider client and the HTTP surface so
//! the binaries and the end-to-end tests can assemble a server.

pub mod catalog_store;
pub mod config;
pub mod deezer;
pub mod server;
pub mod sqlite_persistence;
pub mod user;
