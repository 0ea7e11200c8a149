//! Diagnostic CLI: inspect source catalog exports and exercise the metadata
//! normalization and similarity machinery from the shell.
//!
//! Live synchronization needs a destination transport, which lives outside
//! this crate; embedders wire `SyncEngine` up themselves. These subcommands
//! cover the part that has no such dependency and is what actually needs
//! debugging when a track refuses to match.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tunebridge::normalize::{normalize, MetadataKind};
use tunebridge::similarity::{edit_distance, similar};
use tunebridge::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "tunebridge", about = "Inspect catalog exports and metadata matching")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the playlists in a source export
    Playlists {
        /// Path to the export file (playlists.json)
        snapshot: PathBuf,
    },
    /// Print the tracks of one playlist
    Tracks {
        /// Path to the export file (playlists.json)
        snapshot: PathBuf,
        /// Playlist id; omit for the Liked Songs playlist
        #[arg(long)]
        playlist: Option<String>,
        /// Keep the stored newest-first order instead of reversing to
        /// chronological
        #[arg(long)]
        no_reverse: bool,
    },
    /// Normalize one metadata string
    Normalize {
        text: String,
        #[arg(long, value_enum, default_value = "track")]
        kind: MetadataKind,
    },
    /// Compare two metadata strings the way the matcher would
    Compare {
        a: String,
        b: String,
        #[arg(long, value_enum, default_value = "track")]
        kind: MetadataKind,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Playlists { snapshot } => {
            let snapshot = Snapshot::load(&snapshot)?;
            for pl in snapshot.playlists() {
                println!("{}  -  {} ({} tracks)", pl.id, pl.name, pl.tracks);
            }
        }
        Commands::Tracks {
            snapshot,
            playlist,
            no_reverse,
        } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let entries = snapshot.playlist_entries(playlist.as_deref(), !no_reverse)?;
            for entry in &entries {
                match &entry.track {
                    Some(track) => println!("{}", track.describe()),
                    None => println!("<malformed entry>"),
                }
            }
        }
        Commands::Normalize { text, kind } => {
            println!("{}", normalize(&text, kind));
        }
        Commands::Compare { a, b, kind } => {
            let na = normalize(&a, kind);
            let nb = normalize(&b, kind);
            println!("normalized a: {na}");
            println!("normalized b: {nb}");
            println!("edit distance: {}", edit_distance(&na, &nb));
            println!("similar: {}", similar(&na, &nb));
        }
    }

    Ok(())
}
