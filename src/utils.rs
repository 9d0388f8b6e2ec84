use std::cmp::Ordering;

use crate::types::{SortKey, SortedTableRow, SortedTrack};

/// Names closer than this edit distance are considered the same playlist.
pub const NAME_DISTANCE_LIMIT: usize = 2;

/// Case-insensitive Levenshtein distance between two playlist names.
pub fn name_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Whether a stored playlist name matches the requested one.
///
/// Exact matches, different casing and a single typo (one inserted, removed
/// or replaced character) all count as a match.
pub fn is_fuzzy_match(requested: &str, candidate: &str) -> bool {
    name_distance(requested, candidate) < NAME_DISTANCE_LIMIT
}

/// Builds the destination playlist name for a source playlist and feature.
///
/// Every non-ASCII character of the source name is replaced by exactly one
/// space, e.g. `"Café Mix"` sorted by `tempo` becomes
/// `"Caf  Mix_sorted_by_tempo"`.
pub fn derive_playlist_name(source: &str, feature: &str) -> String {
    let ascii: String = source
        .chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect();
    format!("{}_sorted_by_{}", ascii, feature)
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

/// Splits track ids into comma separated URI lists of at most `size` entries.
pub fn uri_batches<S: AsRef<str>>(track_ids: &[S], size: usize) -> Vec<String> {
    track_ids
        .chunks(size.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|id| track_uri(id.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

/// Whether the accumulated duration has used up the length budget.
///
/// A negative budget means "no limit" and is never reached.
pub fn budget_reached(total_ms: u64, max_length: i64) -> bool {
    match u64::try_from(max_length) {
        Ok(budget) => total_ms >= budget,
        Err(_) => false,
    }
}

/// Parses a secondary sort key of the form `feature`, `feature:asc` or
/// `feature:desc`.
pub fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    let (feature, descending) = match s.split_once(':') {
        None => (s, false),
        Some((feature, "asc")) => (feature, false),
        Some((feature, "desc")) => (feature, true),
        Some((_, order)) => {
            return Err(format!(
                "invalid sort order {:?}, expected asc or desc",
                order
            ));
        }
    };

    let feature = feature.trim();
    if feature.is_empty() {
        return Err("feature name cannot be empty".to_string());
    }

    Ok(SortKey {
        feature: feature.to_string(),
        descending,
    })
}

/// Numeric comparison where `-0.0 == 0.0` and NaN ties with everything.
pub fn compare_values(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders by the primary value ascending, then by each secondary key.
pub fn compare_tracks(a: &SortedTrack, b: &SortedTrack, then: &[SortKey]) -> Ordering {
    compare_values(a.value, b.value).then_with(|| {
        then.iter()
            .zip(a.then.iter().zip(&b.then))
            .map(|(key, (x, y))| {
                let ord = compare_values(*x, *y);
                if key.descending { ord.reverse() } else { ord }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

pub fn reverse_tracks(tracks: &mut Vec<SortedTrack>) {
    tracks.reverse();
}

pub fn sorted_table_rows(tracks: &[SortedTrack]) -> Vec<SortedTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| SortedTableRow {
            position: i + 1,
            track: t.id.clone(),
            value: t.value,
        })
        .collect()
}
