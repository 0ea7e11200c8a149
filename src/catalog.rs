//! Destination catalog interfaces.
//!
//! The core never talks to a transport directly: it sees the destination
//! catalog through these two traits, one read-only search/browse half and one
//! mutation half. Production transports live outside this crate; tests use
//! in-memory implementations.

use anyhow::Result;

use crate::models::{AlbumHit, DestinationTrack};

/// Read-only search/browse surface of the destination catalog.
///
/// All calls are blocking round trips; timeouts and auth are the transport's
/// concern. Errors are opaque to the core and reported as lookup failures.
pub trait CatalogQuery {
    /// Search the albums index. Result order is the destination's relevance
    /// order; the resolver only ever looks at the first few hits.
    fn search_albums(&self, query: &str) -> Result<Vec<AlbumHit>>;

    /// Track list of one album, in album order.
    fn album_tracks(&self, album_id: &str) -> Result<Vec<DestinationTrack>>;

    /// Search the songs index.
    fn search_songs(&self, query: &str) -> Result<Vec<DestinationTrack>>;

    /// Search the videos index. Used only as the Approximate strategy's
    /// fallback for tracks that exist solely as uploads.
    fn search_videos(&self, query: &str) -> Result<Vec<DestinationTrack>>;

    /// "Did you mean" suggestions for a query. Diagnostics only; never
    /// affects resolution outcome.
    fn search_suggestions(&self, query: &str) -> Result<Vec<String>>;
}

/// Mutation surface of the destination catalog.
pub trait CatalogMutation {
    /// Create a playlist and return its id.
    fn create_playlist(&self, title: &str, description: &str) -> Result<String>;

    /// Title of an existing playlist. Used to validate a target playlist id
    /// before a sync run touches it.
    fn playlist_title(&self, playlist_id: &str) -> Result<String>;

    /// Add tracks to a playlist. With `allow_duplicates` false the
    /// destination ignores ids already present, which makes the call
    /// idempotent.
    fn add_playlist_items(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        allow_duplicates: bool,
    ) -> Result<()>;

    /// Mark a track as liked/favorited. Idempotent on the destination side.
    fn mark_liked(&self, track_id: &str) -> Result<()>;
}
