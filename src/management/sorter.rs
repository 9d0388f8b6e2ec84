use std::collections::{HashMap, VecDeque};

use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;

use crate::{
    error::Result,
    spotify::{SpotifyContext, features},
    types::{PlaylistItem, SortKey, SortedTrack},
    utils, warning,
};

/// Result of sorting a playlist by one feature.
#[derive(Debug, Clone, Default)]
pub struct SortOutcome {
    /// Tracks in ascending feature order.
    pub tracks: Vec<SortedTrack>,
    /// Tracks dropped because their features could not be fetched or they
    /// have no track id.
    pub skipped: usize,
    /// Summed duration of the tracks in `tracks`.
    pub total_duration_ms: u64,
}

/// Orders tracks by the value of `feature`, ascending.
///
/// The input is shuffled first so that, when `max_length` cuts the list
/// short, the kept tracks are not always the ones at the top of the
/// playlist. Tracks are then taken one at a time and their feature vector is
/// fetched, adding each track's `duration_ms` to a running total. Taking
/// stops once the total reaches `max_length` (the track that crosses the
/// budget is kept) or the input runs out. A negative `max_length` means no
/// budget.
///
/// A track id that occurs more than once ends up in the result once, at the
/// position of its first occurrence with the values of its last one. Its
/// duration still counts once per occurrence.
///
/// The final sort is stable, but since the accumulation order was random the
/// relative order of tracks with equal values is arbitrary. `-0.0` and `0.0`
/// count as equal.
///
/// # Arguments
///
/// * `ctx` - Request context used for the per-track feature calls
/// * `tracks` - Playlist entries as returned by the track fetcher
/// * `feature` - Name of a numeric field of the audio-features object
/// * `max_length` - Length budget in milliseconds, negative for unbounded
///
/// # Skipped Tracks
///
/// A track whose feature request fails (after the retry policy gave up) or
/// that has no id is dropped and counted in [`SortOutcome::skipped`].
///
/// # Errors
///
/// - [`crate::error::Error::FeatureMissing`] if a fetched vector has no
///   `feature` or `duration_ms` key
/// - [`crate::error::Error::FeatureNotNumeric`] if the value is not a number
/// - [`crate::error::Error::Decode`] if a successful response is malformed
pub async fn sort_by_feature(
    ctx: &SpotifyContext,
    tracks: Vec<PlaylistItem>,
    feature: &str,
    max_length: i64,
) -> Result<SortOutcome> {
    sort_by_keys(ctx, tracks, feature, &[], max_length).await
}

/// Like [`sort_by_feature`], with `then` breaking ties on the primary
/// feature in order. Every key must be present in each feature vector.
pub async fn sort_by_keys(
    ctx: &SpotifyContext,
    mut tracks: Vec<PlaylistItem>,
    feature: &str,
    then: &[SortKey],
    max_length: i64,
) -> Result<SortOutcome> {
    tracks.shuffle(&mut rand::rng());
    let mut queue: VecDeque<PlaylistItem> = tracks.into();

    let pb = ProgressBar::new(queue.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let mut outcome = SortOutcome::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    while !utils::budget_reached(outcome.total_duration_ms, max_length) {
        let Some(item) = queue.pop_front() else {
            break;
        };
        pb.inc(1);

        let Some(track_id) = item.track_id() else {
            outcome.skipped += 1;
            continue;
        };

        pb.set_message(format!("Getting {} for {}", feature, track_id));
        let vector = match features::get_track_features(ctx, track_id).await {
            Ok(vector) => vector,
            Err(e) if e.is_api_failure() => {
                outcome.skipped += 1;
                pb.suspend(|| warning!("Failed to get features for track {}: {}", track_id, e));
                continue;
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        let measured = vector.value(track_id, feature).and_then(|value| {
            let then_values = then
                .iter()
                .map(|key| vector.value(track_id, &key.feature))
                .collect::<Result<Vec<f64>>>()?;
            Ok((value, then_values, vector.duration_ms(track_id)?))
        });
        let (value, then_values, duration_ms) = match measured {
            Ok(measured) => measured,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        match positions.get(track_id) {
            Some(&index) => {
                outcome.tracks[index].value = value;
                outcome.tracks[index].then = then_values;
            }
            None => {
                positions.insert(track_id.to_string(), outcome.tracks.len());
                outcome.tracks.push(SortedTrack {
                    id: track_id.to_string(),
                    value,
                    then: then_values,
                });
            }
        }
        outcome.total_duration_ms = outcome.total_duration_ms.saturating_add(duration_ms);
    }

    pb.finish_and_clear();
    outcome
        .tracks
        .sort_by(|a, b| utils::compare_tracks(a, b, then));

    Ok(outcome)
}
