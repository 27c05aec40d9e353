//! Airwaves artwork service library
//!
//! This library exposes the internal modules for testing and the bundled
//! binaries.

pub mod artwork;
pub mod config;
pub mod server;

// Re-export commonly used types for convenience
pub use artwork::{create_resolver, ArtworkQuery, ArtworkResolver, Resolution, ResultCache};
pub use config::AppConfig;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
