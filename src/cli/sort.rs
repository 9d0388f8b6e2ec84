use tabled::Table;

use crate::{
    error::{Error, Result},
    info,
    management::{self, WriteOutcome},
    spotify::{SpotifyContext, playlist},
    success,
    types::SortKey,
    utils, warning,
};

/// Options of a single sort run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    pub playlist_name: String,
    pub feature: String,
    /// Tie-breakers consulted in order when the primary values are equal.
    pub then: Vec<SortKey>,
    pub reverse: bool,
    /// Length budget in milliseconds, negative for unbounded.
    pub max_length: i64,
    /// Print the final order as a table.
    pub show: bool,
}

/// Runs the whole pipeline: resolve, fetch, sort, then write the result
/// into `<playlist>_sorted_by_<feature>`.
///
/// # Errors
///
/// [`Error::PlaylistNotFound`] when the source playlist cannot be resolved,
/// otherwise whatever the failing stage returned.
pub async fn sort(ctx: &SpotifyContext, options: &SortOptions) -> Result<WriteOutcome> {
    info!("Getting playlist named {}", options.playlist_name);
    let source = playlist::resolve(ctx, &options.playlist_name)
        .await?
        .ok_or_else(|| Error::PlaylistNotFound(options.playlist_name.clone()))?;

    let tracks = playlist::fetch_all_tracks(ctx, &source.id, source.total).await?;
    success!("Playlist {} fetched with {} tracks", source.name, tracks.len());

    info!("Sorting {} tracks by {}", tracks.len(), options.feature);
    let outcome = management::sort_by_keys(
        ctx,
        tracks,
        &options.feature,
        &options.then,
        options.max_length,
    )
    .await?;
    if outcome.skipped > 0 {
        warning!("Skipped {} tracks without features", outcome.skipped);
    }
    success!(
        "Sorted {} tracks, total length {}ms",
        outcome.tracks.len(),
        outcome.total_duration_ms
    );

    let mut sorted = outcome.tracks;
    if options.reverse {
        utils::reverse_tracks(&mut sorted);
    }

    if options.show {
        println!("{}", Table::new(utils::sorted_table_rows(&sorted)));
    }

    let destination = utils::derive_playlist_name(&options.playlist_name, &options.feature);
    let track_ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
    let written = management::ensure_and_populate(ctx, &destination, &track_ids).await?;
    success!(
        "Playlist {} now holds {} tracks",
        destination,
        written.added
    );

    Ok(written)
}
