//! Core data models for catalog matching and playlist sync.

// ============================================================================
// Source Catalog
// ============================================================================

/// A track as described by the source catalog export: three loosely formatted
/// strings, nothing more. This is all the resolver has to work with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl SourceTrack {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
        }
    }

    /// One-line description for progress output: "Title - Artist - Album".
    pub fn describe(&self) -> String {
        format!("{} - {} - {}", self.title, self.artist, self.album)
    }
}

/// One element of a source playlist. Exports sometimes contain entries whose
/// track payload is null (removed/region-locked tracks); those are kept as
/// `None` so the sync engine can warn and skip them.
#[derive(Clone, Debug)]
pub struct PlaylistEntry {
    pub track: Option<SourceTrack>,
}

impl PlaylistEntry {
    pub fn of(track: SourceTrack) -> Self {
        Self { track: Some(track) }
    }

    pub fn malformed() -> Self {
        Self { track: None }
    }
}

// ============================================================================
// Destination Catalog
// ============================================================================

/// Artist credit on a destination track, in credited order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationArtist {
    pub name: String,
}

impl DestinationArtist {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A track as returned by the destination catalog's search/browse surface.
/// `id` is opaque and stable; it is what dedup and writes key on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationTrack {
    pub id: String,
    pub title: String,
    pub artists: Vec<DestinationArtist>,
    pub album: Option<String>,
}

impl DestinationTrack {
    /// Name of the first credited artist, if any.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// One-line description for progress output, with placeholders where the
    /// destination omitted fields.
    pub fn describe(&self) -> String {
        format!(
            "{} - {} - {}",
            self.title,
            self.primary_artist().unwrap_or("<unknown>"),
            self.album.as_deref().unwrap_or("<unknown>"),
        )
    }
}

/// Row from the destination's albums search: just enough to fetch the album's
/// track list.
#[derive(Clone, Debug)]
pub struct AlbumHit {
    pub id: String,
    pub title: String,
}

// ============================================================================
// Resolution Strategies
// ============================================================================

/// Closed set of resolution strategies, cheapest/least accurate first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResolveAlgorithm {
    /// First songs-search result, unconditionally.
    #[default]
    Exact,
    /// First song whose title, primary artist, and album are all byte-equal.
    Extended,
    /// Bracket-stripped containment matching, with a videos-search fallback.
    Approximate,
    /// Full normalized-metadata matching.
    Normalized,
}

// ============================================================================
// Sync Statistics
// ============================================================================

/// Counters for one synchronization run. Created at the start of a
/// `synchronize` call, returned at its end, never shared across calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Distinct destination ids written (or that would be written, dry-run).
    pub added: usize,
    /// Source tracks that resolved to an id already admitted this run.
    pub duplicates: usize,
    /// Tracks that failed resolution or exhausted write retries.
    pub errors: usize,
    /// Malformed source entries (null payload) skipped with a warning.
    pub skipped: usize,
}

impl SyncStats {
    /// Summary line printed at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Added {} tracks, encountered {} duplicates, {} errors, {} skipped",
            self.added, self.duplicates, self.errors, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_placeholders() {
        let track = DestinationTrack {
            id: "v1".to_string(),
            title: "Hey Jude".to_string(),
            artists: vec![],
            album: None,
        };
        assert_eq!(track.describe(), "Hey Jude - <unknown> - <unknown>");
    }

    #[test]
    fn test_primary_artist_order() {
        let track = DestinationTrack {
            id: "v1".to_string(),
            title: "Song".to_string(),
            artists: vec![
                DestinationArtist::named("First"),
                DestinationArtist::named("Second"),
            ],
            album: Some("Album".to_string()),
        };
        assert_eq!(track.primary_artist(), Some("First"));
    }

    #[test]
    fn test_stats_summary() {
        let stats = SyncStats { added: 3, duplicates: 1, errors: 2, skipped: 0 };
        assert_eq!(
            stats.summary(),
            "Added 3 tracks, encountered 1 duplicates, 2 errors, 0 skipped"
        );
    }
}
