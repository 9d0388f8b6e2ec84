use crate::{
    error::Result,
    spotify::{SpotifyContext, read_json},
    types::FeatureVector,
};

/// Retrieves the audio features of one track.
///
/// Uses the `/audio-features/{id}` endpoint. The vector is returned as a map
/// so the caller decides which feature it needs.
///
/// # Errors
///
/// - [`crate::error::Error::Status`] / [`crate::error::Error::RetriesExhausted`]
///   when the API refuses or keeps failing
/// - [`crate::error::Error::Decode`] when a successful response is not a JSON object
pub async fn get_track_features(ctx: &SpotifyContext, track_id: &str) -> Result<FeatureVector> {
    let url = ctx.url(&format!("/audio-features/{id}", id = track_id));
    let response = ctx.send(|client| client.get(&url)).await?;
    read_json(response).await
}
