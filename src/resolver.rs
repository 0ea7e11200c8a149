//! Song resolution: mapping one source track to at most one destination track.
//!
//! Every resolution starts with an album-first phase: finding the album and
//! then looking for the exact track inside it is far more accurate than a
//! songs search for short titles with many contradictory hits. Only when that
//! fails does the songs search run, dispatched through one of four selectable
//! strategies.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::catalog::CatalogQuery;
use crate::models::{DestinationTrack, ResolveAlgorithm, SourceTrack};
use crate::similarity::track_matches;

/// How many albums-search hits the album phase inspects.
const ALBUM_CANDIDATES: usize = 3;

/// Anything bracketed or parenthesized inside a candidate title, for the
/// Approximate strategy's comparison.
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[(].*?[\])]").unwrap());

/// Resolution failure for one source track.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The destination catalog has no acceptable counterpart.
    #[error("did not find \"{}\" by {} from {}", .0.title, .0.artist, .0.album)]
    NotFound(SourceTrack),
    /// A destination lookup failed outright (transport error, empty songs
    /// index for the query).
    #[error("destination lookup failed: {0:#}")]
    Lookup(#[from] anyhow::Error),
}

/// Diagnostic capture for the interactive search entry point. Populated only
/// when a caller passes one in; never alters the resolution outcome.
#[derive(Clone, Debug, Default)]
pub struct ResearchDetails {
    /// The songs-search query string that was issued.
    pub query: Option<String>,
    /// Full ordered candidate list from the songs search.
    pub songs: Option<Vec<DestinationTrack>>,
    /// "Did you mean" suggestions for the query.
    pub suggestions: Option<Vec<String>>,
}

/// Resolves source tracks against a destination catalog's search surface.
pub struct Resolver<'a, C: CatalogQuery> {
    catalog: &'a C,
}

impl<'a, C: CatalogQuery> Resolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Find the destination track for `source` using `algorithm`.
    pub fn resolve(
        &self,
        source: &SourceTrack,
        algorithm: ResolveAlgorithm,
        mut details: Option<&mut ResearchDetails>,
    ) -> Result<DestinationTrack, ResolveError> {
        if let Some(track) = self.album_phase(source)? {
            return Ok(track);
        }

        let query = format!("{} by {}", source.title, source.artist);
        if let Some(d) = details.as_deref_mut() {
            d.query = Some(query.clone());
            // Suggestions are best-effort diagnostics.
            d.suggestions = self.catalog.search_suggestions(&query).ok();
        }

        let songs = self.catalog.search_songs(&query)?;
        if songs.is_empty() {
            return Err(ResolveError::Lookup(anyhow::anyhow!(
                "songs search returned no results for \"{query}\""
            )));
        }
        if let Some(d) = details.as_deref_mut() {
            d.songs = Some(songs.clone());
        }

        match algorithm {
            ResolveAlgorithm::Exact => self.pick_first(source, songs),
            ResolveAlgorithm::Extended => self.pick_extended(source, songs),
            ResolveAlgorithm::Approximate => self.pick_approximate(source, songs),
            ResolveAlgorithm::Normalized => self.pick_normalized(source, songs),
        }
    }

    /// Common first phase: search albums for "{album} by {artist}", scan the
    /// first few hits' track lists for a byte-exact title. Album lookups that
    /// fail (malformed or region-locked album data) are logged and skipped,
    /// never fatal.
    fn album_phase(&self, source: &SourceTrack) -> Result<Option<DestinationTrack>, ResolveError> {
        let query = format!("{} by {}", source.album, source.artist);
        let albums = self.catalog.search_albums(&query)?;

        for album in albums.iter().take(ALBUM_CANDIDATES) {
            match self.catalog.album_tracks(&album.id) {
                Ok(tracks) => {
                    if let Some(track) = tracks.into_iter().find(|t| t.title == source.title) {
                        return Ok(Some(track));
                    }
                }
                Err(e) => {
                    eprintln!("Unable to look up album \"{}\" ({e:#}), continuing...", album.title);
                }
            }
        }

        Ok(None)
    }

    /// Exact: the destination's top hit, unconditionally.
    fn pick_first(
        &self,
        source: &SourceTrack,
        songs: Vec<DestinationTrack>,
    ) -> Result<DestinationTrack, ResolveError> {
        songs
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NotFound(source.clone()))
    }

    /// Extended: first candidate whose title, primary artist, and album are
    /// all byte-identical to the source.
    fn pick_extended(
        &self,
        source: &SourceTrack,
        songs: Vec<DestinationTrack>,
    ) -> Result<DestinationTrack, ResolveError> {
        songs
            .into_iter()
            .find(|song| {
                song.title == source.title
                    && song.primary_artist() == Some(source.artist.as_str())
                    && song.album.as_deref() == Some(source.album.as_str())
            })
            .ok_or_else(|| ResolveError::NotFound(source.clone()))
    }

    /// Approximate: bracket-stripped containment matching over the song
    /// candidates, falling back to a videos search for tracks that only
    /// exist as uploads (reposts usually carry title and artist in the video
    /// name).
    fn pick_approximate(
        &self,
        source: &SourceTrack,
        songs: Vec<DestinationTrack>,
    ) -> Result<DestinationTrack, ResolveError> {
        for song in &songs {
            let stripped = BRACKETED.replace_all(&song.title, "").to_string();
            let title_ok = stripped == source.title
                || stripped.contains(&source.title)
                || source.title.contains(&stripped);
            let artist = song.primary_artist().unwrap_or("");
            let artist_ok = artist == source.artist || artist.contains(&source.artist);
            if title_ok && artist_ok {
                return Ok(song.clone());
            }
        }

        let title_lower = source.title.to_lowercase();
        let first = &songs[0];
        let first_ok = first.title.to_lowercase().contains(&title_lower)
            && first.primary_artist() == Some(source.artist.as_str());
        if first_ok {
            return Ok(first.clone());
        }

        eprintln!("Not found in songs, searching videos");
        let videos = self
            .catalog
            .search_videos(&format!("{} by {}", title_lower, source.artist))?;

        let artist_lower = source.artist.to_lowercase();
        let with_artist = videos.iter().find(|v| {
            let t = v.title.to_lowercase();
            t.contains(&title_lower) && t.contains(&artist_lower)
        });
        let title_only = videos
            .iter()
            .find(|v| v.title.to_lowercase().contains(&title_lower));
        if let Some(video) = with_artist.or(title_only) {
            eprintln!("Found a video");
            return Ok(video.clone());
        }

        Err(ResolveError::NotFound(source.clone()))
    }

    /// Normalized: first candidate accepted by the full normalized-metadata
    /// matcher. On failure, the near misses are printed for the operator.
    fn pick_normalized(
        &self,
        source: &SourceTrack,
        songs: Vec<DestinationTrack>,
    ) -> Result<DestinationTrack, ResolveError> {
        for song in &songs {
            if track_matches(&source.title, &source.album, &source.artist, song) {
                return Ok(song.clone());
            }
        }

        eprintln!(
            "Did not find \"{} by {}\" from {}",
            source.title, source.artist, source.album
        );
        for song in songs.iter().take(5) {
            eprintln!("    POSSIBLE MATCH: {}", song.describe());
        }
        Err(ResolveError::NotFound(source.clone()))
    }
}
