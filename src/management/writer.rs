use crate::{
    error::Result,
    info,
    spotify::{SpotifyContext, playlist},
};

/// What [`ensure_and_populate`] did to the destination playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub playlist_id: String,
    /// Whether the playlist had to be created.
    pub created: bool,
    /// Tracks cleared from an existing playlist.
    pub removed: usize,
    pub added: usize,
    /// Add calls issued.
    pub batches: usize,
}

/// Makes the playlist called `name` contain `track_ids`, in order.
///
/// The destination is looked up with the same fuzzy match as the source.
/// A missing playlist is created as a private playlist; an existing one is
/// emptied first so running the tool twice replaces the previous result
/// instead of appending to it.
///
/// On success the playlist holds exactly `track_ids`. When an add call fails
/// part way the playlist holds a prefix of `track_ids`; a failed batch is
/// never resent after a server error, so no track is added twice.
pub async fn ensure_and_populate<S: AsRef<str>>(
    ctx: &SpotifyContext,
    name: &str,
    track_ids: &[S],
) -> Result<WriteOutcome> {
    let (playlist_id, created, removed) = match playlist::resolve(ctx, name).await? {
        None => {
            info!("Creating playlist {}", name);
            (playlist::create(ctx, name).await?, true, 0)
        }
        Some(existing) => {
            info!(
                "Clearing {} tracks from playlist {}",
                existing.total, existing.name
            );
            let items = playlist::fetch_all_tracks(ctx, &existing.id, existing.total).await?;
            let removed = playlist::remove_tracks(ctx, &existing.id, &items).await?;
            (existing.id, false, removed)
        }
    };

    info!("Adding {} tracks to playlist {}", track_ids.len(), name);
    let batches = playlist::add_tracks(ctx, &playlist_id, track_ids).await?;

    Ok(WriteOutcome {
        playlist_id,
        created,
        removed,
        added: track_ids.len(),
        batches,
    })
}
