//! Reader for source catalog export files.
//!
//! The export is a single JSON document written by the source's backup tool:
//! a `playlists` array, plus an optional `albums` array for liked albums.
//! Playlist tracks are stored newest-first; callers usually reverse them to
//! restore chronological order before syncing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{PlaylistEntry, SourceTrack};

#[derive(Debug, Deserialize)]
pub struct Snapshot {
    playlists: Vec<RawPlaylist>,
    #[serde(default)]
    albums: Vec<RawLikedAlbum>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    tracks: Vec<RawEntry>,
}

/// One playlist row. `track` is null for removed or region-locked tracks;
/// those rows are kept so the sync engine can warn about them.
#[derive(Debug, Deserialize)]
struct RawEntry {
    track: Option<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    name: String,
    album: RawAlbum,
    #[serde(default)]
    artists: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawLikedAlbum {
    album: RawAlbumWithTracks,
}

#[derive(Debug, Deserialize)]
struct RawAlbumWithTracks {
    name: String,
    tracks: RawAlbumTracks,
}

#[derive(Debug, Deserialize)]
struct RawAlbumTracks {
    items: Vec<RawAlbumTrack>,
}

#[derive(Debug, Deserialize)]
struct RawAlbumTrack {
    name: String,
    #[serde(default)]
    artists: Vec<RawArtist>,
}

/// One row of the `playlists` listing.
#[derive(Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub tracks: usize,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening snapshot file {}", path.display()))?;
        let snapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing snapshot file {}", path.display()))?;
        Ok(snapshot)
    }

    /// All playlists in export order, with placeholder fields where the
    /// export omitted them.
    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        self.playlists
            .iter()
            .map(|pl| PlaylistSummary {
                id: pl.id.clone().unwrap_or_default(),
                name: pl.name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
                tracks: pl.tracks.len(),
            })
            .collect()
    }

    /// Entries of one playlist, selected by id, or of the "Liked Songs"
    /// playlist when `selector` is `None`. With `reverse` the stored
    /// newest-first order is flipped back to chronological.
    pub fn playlist_entries(
        &self,
        selector: Option<&str>,
        reverse: bool,
    ) -> Result<Vec<PlaylistEntry>> {
        let playlist = self
            .playlists
            .iter()
            .find(|pl| match selector {
                Some(id) => pl.id.as_deref() == Some(id),
                None => pl.name.as_deref() == Some("Liked Songs"),
            });
        let Some(playlist) = playlist else {
            match selector {
                Some(id) => bail!("could not find source playlist {id}"),
                None => bail!("could not find the Liked Songs playlist"),
            }
        };

        let mut entries: Vec<PlaylistEntry> =
            playlist.tracks.iter().map(RawEntry::to_entry).collect();
        if reverse {
            entries.reverse();
        }
        Ok(entries)
    }

    /// Tracks of all liked albums, flattened in export order. Empty when the
    /// export carries no `albums` section.
    pub fn liked_album_entries(&self) -> Vec<PlaylistEntry> {
        self.albums
            .iter()
            .flat_map(|liked| {
                let album_name = &liked.album.name;
                liked.album.tracks.items.iter().map(move |track| {
                    match track.artists.first() {
                        Some(artist) => PlaylistEntry::of(SourceTrack::new(
                            &track.name,
                            &artist.name,
                            album_name,
                        )),
                        None => PlaylistEntry::malformed(),
                    }
                })
            })
            .collect()
    }
}

impl RawEntry {
    fn to_entry(&self) -> PlaylistEntry {
        // A present track with no artist credit is as unusable as a null
        // payload; both become malformed entries.
        match &self.track {
            Some(track) => match track.artists.first() {
                Some(artist) => PlaylistEntry::of(SourceTrack::new(
                    &track.name,
                    &artist.name,
                    &track.album.name,
                )),
                None => PlaylistEntry::malformed(),
            },
            None => PlaylistEntry::malformed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        serde_json::from_str(
            r#"{
                "playlists": [
                    {
                        "id": "liked",
                        "name": "Liked Songs",
                        "tracks": [
                            {"track": {"name": "Newest", "album": {"name": "B"}, "artists": [{"name": "Artist B"}]}},
                            {"track": null},
                            {"track": {"name": "Oldest", "album": {"name": "A"}, "artists": [{"name": "Artist A"}]}}
                        ]
                    },
                    {
                        "id": "pl42",
                        "name": "Road Trip",
                        "tracks": [
                            {"track": {"name": "Song", "album": {"name": "Album"}, "artists": [{"name": "Artist"}]}}
                        ]
                    }
                ],
                "albums": [
                    {
                        "album": {
                            "name": "Liked Album",
                            "tracks": {
                                "items": [
                                    {"name": "Track One", "artists": [{"name": "Band"}]},
                                    {"name": "Track Two", "artists": [{"name": "Band"}]}
                                ]
                            }
                        }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_playlists_listing() {
        let listing = sample().playlists();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "Liked Songs");
        assert_eq!(listing[0].tracks, 3);
        assert_eq!(listing[1].id, "pl42");
    }

    #[test]
    fn test_select_by_id() {
        let entries = sample().playlist_entries(Some("pl42"), false).unwrap();
        assert_eq!(entries.len(), 1);
        let track = entries[0].track.as_ref().unwrap();
        assert_eq!(track.title, "Song");
        assert_eq!(track.artist, "Artist");
        assert_eq!(track.album, "Album");
    }

    #[test]
    fn test_none_selects_liked_songs() {
        let entries = sample().playlist_entries(None, false).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].track.as_ref().unwrap().title, "Newest");
    }

    #[test]
    fn test_reverse_restores_chronological_order() {
        let entries = sample().playlist_entries(None, true).unwrap();
        assert_eq!(entries[0].track.as_ref().unwrap().title, "Oldest");
        assert_eq!(entries[2].track.as_ref().unwrap().title, "Newest");
    }

    #[test]
    fn test_null_payload_kept_as_malformed() {
        let entries = sample().playlist_entries(None, false).unwrap();
        assert!(entries[1].track.is_none());
    }

    #[test]
    fn test_unknown_playlist_is_error() {
        let err = sample().playlist_entries(Some("nope"), false).unwrap_err();
        assert!(format!("{err:#}").contains("nope"));
    }

    #[test]
    fn test_liked_album_entries() {
        let entries = sample().liked_album_entries();
        assert_eq!(entries.len(), 2);
        let track = entries[0].track.as_ref().unwrap();
        assert_eq!(track.title, "Track One");
        assert_eq!(track.artist, "Band");
        assert_eq!(track.album, "Liked Album");
    }

    #[test]
    fn test_missing_albums_section() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"playlists": []}"#).unwrap();
        assert!(snapshot.liked_album_entries().is_empty());
    }
}
