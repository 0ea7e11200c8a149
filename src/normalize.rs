//! Metadata normalization for cross-catalog track matching.
//!
//! Source and destination catalogs disagree on punctuation, bracketed
//! annotations, edition tags, and transliteration. `normalize` reduces both
//! sides to a comparable form. The transform is total (never fails) and
//! idempotent: normalizing an already-normalized string returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which kind of metadata is being normalized. The cleanup patterns differ:
/// track titles carry featuring credits, albums carry edition words, artist
/// names are compared as a single collapsed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum MetadataKind {
    Track,
    Album,
    Artist,
}

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Bracketed/parenthesized featuring and production credits:
/// "(feat. Artist)", "[ft Someone]", "{prod. by X}". Applied to lowercased
/// text; must run before punctuation stripping removes the brackets.
static FEATURE_BRACKETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[({](?:feat|featuring|ft|with|prod|prod\.? by|produced by)\.? .*?[\])}]")
        .unwrap()
});

/// Standalone edition/version words in track titles. `remix` is deliberately
/// absent: a remix is a different track, not a variant spelling of the same
/// one.
static TRACK_EDITION_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:deluxe|instrumental|bonus\strack|radio|video|edit|version|edition|single|mono|original|mix|lp|extended|remaster(?:ed)?|re-?edit)(?:\b|$)")
        .unwrap()
});

/// Trailing featuring credit without brackets: "Song feat Artist", "Song prod. by X".
static TRACK_FEAT_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:ft\.?|feat\.?|featuring|with|prod\.?(?:\s?by)?)\b.*$").unwrap()
});

/// Album edition/version words: "(Deluxe Edition)", "25th Anniversary", etc.
static ALBUM_EDITION_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:the|super|deluxe|special|anniversary|\d\dth|extended|version|expanded|edition|re-?master(?:ed)?)(?:\b|$)")
        .unwrap()
});

/// Album release-type words: "EP", "LP", "Single", "Instrumentals".
static ALBUM_RELEASE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:ep|lp|single|instrumentals?)(?:\b|$)").unwrap());

/// Leading "the " on artist names ("The Beatles" vs "Beatles").
static ARTIST_THE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^the\s+").unwrap());

/// Punctuation stripped in the final cleanup pass. Runs after the
/// word-boundary patterns above, which would otherwise stop matching.
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.,"'`´’:;+*!/\-()\[\]{}]"#).unwrap());

/// Maximal runs of ASCII digits, for year removal.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Collapse any whitespace run to a single space.
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// TRANSLITERATION
// ============================================================================

/// Transliterate letters outside the base Latin alphabet to their closest
/// ASCII equivalent using a fixed character table. Unmapped characters pass
/// through unchanged (Cyrillic, CJK, etc. are not folded).
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => out.push('a'),
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => out.push('A'),
            'é' | 'è' | 'ê' | 'ë' => out.push('e'),
            'É' | 'È' | 'Ê' | 'Ë' => out.push('E'),
            'í' | 'ì' | 'î' | 'ï' => out.push('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' => out.push('I'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => out.push('o'),
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => out.push('O'),
            'ú' | 'ù' | 'û' | 'ü' => out.push('u'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => out.push('U'),
            'ý' | 'ÿ' => out.push('y'),
            'Ý' | 'Ÿ' => out.push('Y'),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'ß' => out.push_str("ss"),
            'þ' => out.push_str("th"),
            'Þ' => out.push_str("TH"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove standalone 4-digit years in 1700–2099. A year embedded in a longer
/// digit run (catalog numbers, "20199") is left alone, which is why this is a
/// digit-run scan rather than another word-boundary pattern.
fn strip_years(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in DIGIT_RUN.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        let run = m.as_str();
        let is_year = run.len() == 4
            && run
                .parse::<u32>()
                .is_ok_and(|y| (1700..=2099).contains(&y));
        if !is_year {
            out.push_str(run);
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize one metadata string for comparison.
///
/// Steps, in order: fixed-table transliteration, lowercase, `&` to `and`,
/// kind-specific cleanup, year removal, punctuation strip, whitespace
/// collapse. Bracketed-credit removal must precede the trailing-credit
/// pattern, and punctuation stripping must come last of the pattern passes or
/// it would break the word boundaries the other patterns rely on.
pub fn normalize(text: &str, kind: MetadataKind) -> String {
    let mut result = transliterate(text).to_lowercase();
    result = result.replace('&', "and");

    match kind {
        MetadataKind::Track => {
            result = FEATURE_BRACKETS.replace_all(&result, "").to_string();
            result = TRACK_EDITION_WORDS.replace_all(&result, "").to_string();
            result = TRACK_FEAT_TAIL.replace_all(&result, "").to_string();
        }
        MetadataKind::Album => {
            result = ALBUM_EDITION_WORDS.replace_all(&result, "").to_string();
            result = ALBUM_RELEASE_WORDS.replace_all(&result, "").to_string();
        }
        MetadataKind::Artist => {
            result = ARTIST_THE_PREFIX.replace(&result, "").to_string();
            result = MULTI_SPACE.replace_all(&result, "").to_string();
        }
    }

    result = strip_years(&result);
    result = PUNCTUATION.replace_all(&result, "").to_string();
    MULTI_SPACE.replace_all(&result, " ").trim().to_string()
}

pub fn normalize_track(title: &str) -> String {
    normalize(title, MetadataKind::Track)
}

pub fn normalize_album(album: &str) -> String {
    normalize(album, MetadataKind::Album)
}

pub fn normalize_artist(artist: &str) -> String {
    normalize(artist, MetadataKind::Artist)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate_table() {
        assert_eq!(transliterate("Björk"), "Bjork");
        assert_eq!(transliterate("Beyoncé"), "Beyonce");
        assert_eq!(transliterate("Señor Coçonut"), "Senor Coconut");
        assert_eq!(transliterate("Encyclopædia"), "Encyclopaedia");
        assert_eq!(transliterate("Straße"), "Strasse");
    }

    #[test]
    fn test_transliterate_unmapped_pass_through() {
        // No folding of scripts outside the table.
        assert_eq!(transliterate("кино"), "кино");
        assert_eq!(transliterate("東京"), "東京");
    }

    #[test]
    fn test_track_strips_feature_and_remaster() {
        let out = normalize_track("Song (feat. Artist) [Remastered]");
        assert!(!out.contains("feat"));
        assert!(!out.contains("remaster"));
        assert_eq!(out, "song");
    }

    #[test]
    fn test_track_keeps_remix() {
        assert_eq!(normalize_track("Song Remix"), "song remix");
        // ...but plain "Mix" is an edition word.
        assert_eq!(normalize_track("Song Mix"), "song");
    }

    #[test]
    fn test_track_trailing_feat_without_brackets() {
        assert_eq!(normalize_track("Umbrella feat. Jay-Z"), "umbrella");
        assert_eq!(normalize_track("Money prod. by Someone"), "money");
    }

    #[test]
    fn test_album_edition_words() {
        assert_eq!(
            normalize_album("The Wall (Deluxe Edition) [2011 Remastered]"),
            "wall"
        );
        assert_eq!(normalize_album("Abbey Road 50th Anniversary"), "abbey road");
        assert_eq!(normalize_album("Hurry Up, We're Dreaming LP"), "hurry up were dreaming");
    }

    #[test]
    fn test_artist_collapsed_token() {
        assert_eq!(normalize_artist("The Beatles"), "beatles");
        assert_eq!(normalize_artist("Daft Punk"), "daftpunk");
    }

    #[test]
    fn test_ampersand_becomes_and() {
        assert_eq!(normalize_track("Rock & Roll"), "rock and roll");
    }

    #[test]
    fn test_year_removal() {
        assert_eq!(normalize_album("Live 1984"), "live");
        // Longer digit runs are not years.
        assert_eq!(normalize_track("Track 20199"), "track 20199");
        // Out-of-range 4-digit numbers survive.
        assert_eq!(normalize_track("Room 1604"), "room 1604");
    }

    #[test]
    fn test_punctuation_strip() {
        assert_eq!(normalize_track("Don't Stop Me Now!"), "dont stop me now");
        assert_eq!(normalize_track("S.O.S."), "sos");
    }

    #[test]
    fn test_idempotence() {
        for (text, kind) in [
            ("Song (feat. Artist) [Remastered]", MetadataKind::Track),
            ("The Wall (Deluxe Edition)", MetadataKind::Album),
            ("The Beatles & Friends", MetadataKind::Artist),
            ("Björk — Jóga 1997", MetadataKind::Track),
        ] {
            let once = normalize(text, kind);
            assert_eq!(normalize(&once, kind), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_total_on_degenerate_input() {
        assert_eq!(normalize_track(""), "");
        assert_eq!(normalize_artist("   "), "");
        assert_eq!(normalize_album("()[]{}"), "");
    }
}
