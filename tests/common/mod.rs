//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeCatalogs, TestClient, TestServer};
//!
//! #[tokio::test]
//! async fn test_health() {
//!     let catalogs = FakeCatalogs::spawn().await;
//!     let server = TestServer::spawn(&catalogs).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     assert!(client.health().await.status().is_success());
//! }
//! ```

mod client;
mod fake_catalogs;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use fake_catalogs::FakeCatalogs;
pub use server::TestServer;
