use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::artwork::{ArtworkResolver, ResultCache};

use super::ServerConfig;

pub type GuardedResolver = Arc<ArtworkResolver>;
pub type GuardedResultCache = Arc<ResultCache>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub resolver: GuardedResolver,
    pub cache: GuardedResultCache,
}

impl ServerState {
    /// The cache exposed over HTTP is always the resolver's own.
    pub fn new(config: ServerConfig, resolver: ArtworkResolver) -> Self {
        let cache = resolver.cache().clone();
        ServerState {
            config,
            start_time: Instant::now(),
            resolver: Arc::new(resolver),
            cache,
        }
    }
}

impl FromRef<ServerState> for GuardedResolver {
    fn from_ref(input: &ServerState) -> Self {
        input.resolver.clone()
    }
}

impl FromRef<ServerState> for GuardedResultCache {
    fn from_ref(input: &ServerState) -> Self {
        input.cache.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
