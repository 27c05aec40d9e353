//! Artwork resolution for now-playing tiles.
//!
//! Given the artwork reference a player reported together with the track
//! title and artist, works out the best image URL to show:
//! - [`classifier`]: keyword heuristics for placeholder and playlist covers
//! - [`liveness`]: existence probe for supplied references
//! - [`sources`]: catalog adapters (Spotify, iTunes, Last.fm, generated)
//! - [`cache`]: per-process result cache
//! - [`resolver`]: the decision flow tying the above together

pub mod cache;
pub mod classifier;
pub mod factory;
pub mod liveness;
pub mod models;
pub mod resolver;
pub mod sources;

pub use cache::{CacheStats, ResultCache};
pub use factory::{create_adapters, create_resolver};
pub use liveness::{HttpLivenessProbe, LivenessProbe};
pub use models::{
    ArtworkCandidate, ArtworkQuery, ArtworkSourceKind, QualityTier, Resolution, ResolutionOutcome,
};
pub use resolver::ArtworkResolver;
pub use sources::{ArtworkAdapter, LookupError};
