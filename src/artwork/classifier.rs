//! Keyword heuristics flagging low-value artwork references.
//!
//! Matching is plain substring search on the lowercased reference, so a
//! genuine track called "Live Forever" is flagged as a playlist cover. That
//! tradeoff is accepted.

const PLAYLIST_KEYWORDS: &[&str] = &[
    "playlist",
    "mix",
    "dj",
    "radio",
    "station",
    "live",
    "stream",
    "broadcast",
    "show",
    "program",
    "session",
    "set",
];

const GENERIC_KEYWORDS: &[&str] = &[
    "default",
    "placeholder",
    "unknown",
    "no-artwork",
    "music-note",
    "album-cover",
    "generic",
];

fn contains_any(reference: &str, keywords: &[&str]) -> bool {
    let lowered = reference.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// True if the reference looks like a playlist, show or station cover.
pub fn is_playlist_cover(reference: &str) -> bool {
    contains_any(reference, PLAYLIST_KEYWORDS)
}

/// True if the reference looks like a stock placeholder image.
pub fn is_generic_artwork(reference: &str) -> bool {
    contains_any(reference, GENERIC_KEYWORDS)
}

pub fn needs_replacement(reference: &str) -> bool {
    is_playlist_cover(reference) || is_generic_artwork(reference)
}
