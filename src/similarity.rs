//! String similarity and track-equivalence decisions.
//!
//! Builds on the normalizer: `similar` decides whether two normalized strings
//! refer to the same thing, and the `*_matches` functions wrap it with the
//! metadata-specific quirks (colon-embedded artists in titles, concatenated
//! multi-artist fields, instrumental variants).

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::models::DestinationTrack;
use crate::normalize::{normalize_album, normalize_artist, normalize_track};

/// Longer string may be at most 1.7x the shorter before the pair is rejected
/// outright as too dissimilar in length to be worth comparing.
const LENGTH_RATIO_LIMIT: f64 = 1.7;

/// Maximum edit distance still considered a typo/diacritic slip.
const EDIT_DISTANCE_LIMIT: usize = 2;

/// Separators used when a catalog concatenates several artists into one
/// field: "A & B", "A, B", "A/B", "A and B", "A with C".
static ARTIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:[&,/]|\band\b|\bwith\b)\s*").unwrap());

/// Classic single-character insert/delete/substitute edit distance.
/// Symmetric, zero only for identical strings, triangle inequality holds.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Decide whether two strings should be considered equivalent.
///
/// Checks, in order, short-circuiting on the first hit: length-ratio guard
/// (applies to everything below), equality or substring containment,
/// word-reorder (equal token multisets for equal-length multi-word strings),
/// edit distance <= 2, and equality after removing all whitespace.
pub fn similar(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    if len_a > LENGTH_RATIO_LIMIT * len_b || len_b > LENGTH_RATIO_LIMIT * len_a {
        return false;
    }

    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();
    if words_a.len() > 1 && words_a.len() == words_b.len() {
        let set_a: FxHashSet<&str> = words_a.iter().copied().collect();
        let set_b: FxHashSet<&str> = words_b.iter().copied().collect();
        if set_a == set_b {
            return true;
        }
    }

    if edit_distance(&a, &b) <= EDIT_DISTANCE_LIMIT {
        return true;
    }

    a.replace(' ', "") == b.replace(' ', "")
}

/// "Artist: Song" titles hide the real track name after the colon. Returns
/// the normalized tail when the raw title splits into exactly two parts.
fn colon_tail(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, ':');
    let _head = parts.next()?;
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(normalize_track(tail))
}

/// Do two raw track titles refer to the same song?
pub fn track_name_matches(t1: &str, t2: &str) -> bool {
    let clean1 = normalize_track(t1);
    let clean2 = normalize_track(t2);
    if similar(&clean1, &clean2) {
        return true;
    }

    // Retry with the text after a single colon on either side.
    let retry1 = colon_tail(t1).unwrap_or(clean1);
    let retry2 = colon_tail(t2).unwrap_or(clean2);
    similar(&retry1, &retry2)
}

/// Do two raw album names refer to the same album?
pub fn album_name_matches(a1: &str, a2: &str) -> bool {
    similar(&normalize_album(a1), &normalize_album(a2))
}

/// Is `needle` one of the separated candidate names inside `haystack`?
fn contains_artist_candidate(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    ARTIST_SEPARATOR
        .split(&haystack.to_lowercase())
        .any(|part| part.trim() == needle)
}

/// Do two raw artist strings refer to the same artist? Handles destination
/// catalogs that concatenate multiple artists into one field before falling
/// back to normalized comparison.
pub fn artist_name_matches(ar1: &str, ar2: &str) -> bool {
    if contains_artist_candidate(ar2, ar1) || contains_artist_candidate(ar1, ar2) {
        return true;
    }
    similar(&normalize_artist(ar1), &normalize_artist(ar2))
}

/// Composite decision: does a destination track match the source triple?
///
/// Byte-identical title+artist is accepted without normalization. An
/// instrumental on one side only is always rejected. Otherwise the track and
/// artist names must match, and either the albums match too or the normalized
/// titles are character-for-character equal (singles vs. studio albums often
/// disagree on album while the title is unambiguous).
pub fn track_matches(
    source_title: &str,
    source_album: &str,
    source_artist: &str,
    candidate: &DestinationTrack,
) -> bool {
    let cand_title = candidate.title.as_str();
    let cand_album = candidate.album.as_deref().unwrap_or("");
    let cand_artist = candidate.primary_artist().unwrap_or("");

    if source_title == cand_title && source_artist == cand_artist {
        return true;
    }

    let source_is_instrumental = format!("{source_title} {source_album} {source_artist}")
        .to_lowercase()
        .contains("instrumental");
    let cand_is_instrumental = format!("{cand_title} {cand_album} {cand_artist}")
        .to_lowercase()
        .contains("instrumental");
    if source_is_instrumental != cand_is_instrumental {
        return false;
    }

    if track_name_matches(source_title, cand_title) && artist_name_matches(source_artist, cand_artist)
    {
        if album_name_matches(source_album, cand_album) {
            return true;
        }
        // Exact-title override tolerates album mismatches.
        if normalize_track(source_title) == normalize_track(cand_title) {
            return true;
        }
    }

    false
}
