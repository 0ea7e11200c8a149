//! Playlist synchronization: resolve each source track, deduplicate by
//! destination id, and apply idempotent writes with retry.
//!
//! One `synchronize` call owns its stats and dedup set; nothing is shared
//! across calls. The engine is single-threaded by design — the per-track
//! delay exists to self-throttle against the destination's rate limits, not
//! to yield to other work.

use std::thread;
use std::time::Duration;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::catalog::{CatalogMutation, CatalogQuery};
use crate::models::{PlaylistEntry, ResolveAlgorithm, SyncStats};
use crate::progress::{create_progress_bar, create_spinner, report_line};
use crate::resolver::Resolver;
use crate::retry::{retry, Backoff};

/// Fatal sync failures. Per-track problems are counted in `SyncStats`
/// instead; only the lack of a usable target aborts a run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unable to validate destination playlist {playlist_id}: {source:#}")]
    PlaylistValidation {
        playlist_id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("could not create destination playlist \"{title}\": {source:#}")]
    PlaylistCreation {
        title: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Per-run knobs. All configuration is explicit; the engine reads no ambient
/// state.
#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    /// Resolve and report, but perform no destination writes.
    pub dry_run: bool,
    /// Sleep between tracks to respect destination rate limits. Zero skips
    /// the sleep entirely.
    pub track_delay: Duration,
    pub algorithm: ResolveAlgorithm,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            track_delay: Duration::from_millis(100),
            algorithm: ResolveAlgorithm::Exact,
        }
    }
}

/// Drives one-way playlist synchronization against a destination catalog.
pub struct SyncEngine<'a, Q: CatalogQuery, M: CatalogMutation> {
    query: &'a Q,
    mutate: &'a M,
    backoff: Backoff,
}

impl<'a, Q: CatalogQuery, M: CatalogMutation> SyncEngine<'a, Q, M> {
    pub fn new(query: &'a Q, mutate: &'a M) -> Self {
        Self {
            query,
            mutate,
            backoff: Backoff::default(),
        }
    }

    /// Replace the default write-retry policy (tests use zero-delay).
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Create a destination playlist, retrying with backoff. Exhausting the
    /// retries here is fatal: there is no target to sync into.
    pub fn create_named_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<String, SyncError> {
        let spinner = create_spinner(&format!("Creating playlist \"{title}\""));
        let result = retry(&self.backoff, "create_playlist", || {
            self.mutate.create_playlist(title, description)
        });
        spinner.finish_and_clear();
        let id = result.map_err(|e| SyncError::PlaylistCreation {
            title: title.to_string(),
            source: e,
        })?;

        // The destination needs a moment before the fresh id is usable.
        // Zero-delay policies (tests) skip the settle wait too.
        if !self.backoff.initial_delay.is_zero() {
            thread::sleep(Duration::from_secs(1));
        }

        Ok(id)
    }

    /// Synchronize a sequence of source entries into the destination.
    ///
    /// With a playlist id, resolved tracks are added to that playlist;
    /// without one they are marked as liked. Each distinct destination id is
    /// written at most once per run; later occurrences count as duplicates.
    /// Per-track failures (resolution, exhausted write retries) are counted
    /// and the run continues.
    pub fn synchronize(
        &self,
        entries: &[PlaylistEntry],
        playlist_id: Option<&str>,
        options: &SyncOptions,
    ) -> Result<SyncStats, SyncError> {
        if let Some(id) = playlist_id {
            let title =
                self.mutate
                    .playlist_title(id)
                    .map_err(|e| SyncError::PlaylistValidation {
                        playlist_id: id.to_string(),
                        source: e,
                    })?;
            println!("== Destination playlist: {title}");
        }

        let resolver = Resolver::new(self.query);
        let mut stats = SyncStats::default();
        let mut written: FxHashSet<String> = FxHashSet::default();

        let pb = create_progress_bar(entries.len() as u64, "Syncing tracks");

        for entry in entries {
            pb.inc(1);

            let Some(source) = &entry.track else {
                report_line(&pb, "WARNING: source entry has no track payload, skipping");
                stats.skipped += 1;
                continue;
            };

            report_line(&pb, format!("Source:      {}", source.describe()));

            let found = match resolver.resolve(source, options.algorithm, None) {
                Ok(found) => found,
                Err(e) => {
                    report_line(&pb, format!("ERROR: unable to look up track: {e}"));
                    stats.errors += 1;
                    continue;
                }
            };

            report_line(&pb, format!("  Matched:   {}", found.describe()));

            if !written.insert(found.id.clone()) {
                report_line(&pb, "  (duplicate, this track has already been added)");
                stats.duplicates += 1;
            } else {
                stats.added += 1;

                if !options.dry_run {
                    let ids = [found.id.clone()];
                    let write = || match playlist_id {
                        Some(pl) => self.mutate.add_playlist_items(pl, &ids, false),
                        None => self.mutate.mark_liked(&found.id),
                    };
                    if let Err(e) = retry(&self.backoff, "destination write", write) {
                        // The id stays in the dedup set: later duplicates are
                        // reported rather than re-triggering the failing call.
                        report_line(&pb, format!("ERROR: write gave up for {}: {e:#}", found.id));
                        stats.errors += 1;
                    }
                }
            }

            if !options.track_delay.is_zero() {
                thread::sleep(options.track_delay);
            }
        }

        pb.finish_and_clear();
        println!("{}", stats.summary());
        Ok(stats)
    }
}
