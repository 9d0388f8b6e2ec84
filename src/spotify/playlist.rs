use crate::{
    error::Result,
    info,
    spotify::{SpotifyContext, read_json},
    types::{
        CreatePlaylistRequest, CreatePlaylistResponse, GetUserPlaylistsResponse, PlaylistItem,
        PlaylistRef, PlaylistTracksResponse, RemoveTracksRequest, TrackUri,
    },
    utils, warning,
};

/// Page size of the playlist track listing.
pub const PAGE_SIZE: u64 = 100;

/// Most URIs sent in one add call.
pub const ADD_BATCH_SIZE: usize = 90;

/// Most URIs the API accepts in one remove call.
pub const REMOVE_BATCH_SIZE: usize = 100;

const PLAYLISTS_PAGE_LIMIT: u32 = 50;

/// Finds one of the current user's playlists by name.
///
/// Walks the user's playlists in listing order and returns the first one
/// whose name is within a single edit of `name`, ignoring case (see
/// [`utils::is_fuzzy_match`]). Further pages are only requested while no
/// match has been found.
///
/// # Returns
///
/// - `Ok(Some(PlaylistRef))` - id, name and track count of the match
/// - `Ok(None)` - no playlist matched
/// - `Err(Error)` - the listing failed after all retries
///
/// # Example
///
/// ```
/// match resolve(&ctx, "My Mix").await? {
///     Some(playlist) => println!("{} has {} tracks", playlist.id, playlist.total),
///     None => println!("not found"),
/// }
/// ```
pub async fn resolve(ctx: &SpotifyContext, name: &str) -> Result<Option<PlaylistRef>> {
    let mut next = Some(ctx.url(&format!(
        "/me/playlists?limit={limit}",
        limit = PLAYLISTS_PAGE_LIMIT
    )));

    while let Some(url) = next {
        let response = ctx.send(|client| client.get(&url)).await?;
        let page: GetUserPlaylistsResponse = read_json(response).await?;

        if let Some(found) = page
            .items
            .into_iter()
            .find(|p| utils::is_fuzzy_match(name, &p.name))
        {
            return Ok(Some(found.into()));
        }

        next = page.next;
    }

    Ok(None)
}

/// Retrieves every entry of a playlist, `PAGE_SIZE` entries per request.
///
/// Requests only the track ids and keeps the order of the playlist. Offsets
/// advance from 0 until they reach `total`, the count reported when the
/// playlist was resolved.
///
/// # Stale Totals
///
/// If the playlist changed since `total` was read the result is best effort:
/// the loop stops early on an empty page and never asks beyond `total`, so
/// tracks added in between are missed. A warning is printed whenever the
/// number of entries differs from `total`.
pub async fn fetch_all_tracks(
    ctx: &SpotifyContext,
    playlist_id: &str,
    total: u64,
) -> Result<Vec<PlaylistItem>> {
    let url = ctx.url(&format!("/playlists/{id}/tracks", id = playlist_id));
    let limit = PAGE_SIZE.to_string();
    let mut result: Vec<PlaylistItem> = Vec::new();
    let mut offset: u64 = 0;

    while offset < total {
        let offset_param = offset.to_string();
        let response = ctx
            .send(|client| {
                client.get(&url).query(&[
                    ("offset", offset_param.as_str()),
                    ("limit", limit.as_str()),
                    ("fields", "items(track(id))"),
                ])
            })
            .await?;
        let page: PlaylistTracksResponse = read_json(response).await?;
        offset += PAGE_SIZE;

        if page.items.is_empty() {
            break;
        }
        result.extend(page.items);
    }

    if result.len() as u64 != total {
        warning!(
            "Playlist {} reported {} tracks but {} were fetched",
            playlist_id,
            total,
            result.len()
        );
    }

    Ok(result)
}

/// Creates a private playlist for the current user and returns its id.
pub async fn create(ctx: &SpotifyContext, name: &str) -> Result<String> {
    let url = ctx.url("/me/playlists");
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: String::new(),
        public: false,
    };

    let response = ctx
        .send_once(|client| client.post(&url).json(&body))
        .await?;
    let created: CreatePlaylistResponse = read_json(response).await?;
    info!("Playlist {} created", created.name);

    Ok(created.id)
}

/// Removes the given entries from a playlist.
///
/// Entries without a track id are ignored. Removals are sent in groups of
/// [`REMOVE_BATCH_SIZE`]; nothing is sent for an empty list.
///
/// # Returns
///
/// The number of track URIs sent for removal.
pub async fn remove_tracks(
    ctx: &SpotifyContext,
    playlist_id: &str,
    items: &[PlaylistItem],
) -> Result<usize> {
    let url = ctx.url(&format!("/playlists/{id}/tracks", id = playlist_id));
    let uris: Vec<TrackUri> = items
        .iter()
        .filter_map(|item| item.track_id())
        .map(|id| TrackUri {
            uri: utils::track_uri(id),
        })
        .collect();

    for chunk in uris.chunks(REMOVE_BATCH_SIZE) {
        let body = RemoveTracksRequest {
            tracks: chunk.to_vec(),
        };
        ctx.send(|client| client.delete(&url).json(&body)).await?;
    }

    Ok(uris.len())
}

/// Appends tracks to a playlist, [`ADD_BATCH_SIZE`] URIs per call.
///
/// Batches are sent in order so the playlist ends up in the order of
/// `track_ids`. Adds are not idempotent, so a batch is only resent when the
/// server answered 429 or could not be reached (see
/// [`SpotifyContext::send_once`]); a 5xx aborts the run and leaves the
/// playlist holding the batches sent so far.
///
/// # Returns
///
/// The number of add calls issued.
pub async fn add_tracks<S: AsRef<str>>(
    ctx: &SpotifyContext,
    playlist_id: &str,
    track_ids: &[S],
) -> Result<usize> {
    let url = ctx.url(&format!("/playlists/{id}/tracks", id = playlist_id));
    let batches = utils::uri_batches(track_ids, ADD_BATCH_SIZE);

    for uris in &batches {
        ctx.send_once(|client| client.post(&url).query(&[("uris", uris.as_str())]))
            .await?;
    }

    Ok(batches.len())
}

/// Appends a single track to a playlist.
pub async fn add_track(ctx: &SpotifyContext, playlist_id: &str, track_id: &str) -> Result<()> {
    add_tracks(ctx, playlist_id, &[track_id]).await?;
    Ok(())
}
