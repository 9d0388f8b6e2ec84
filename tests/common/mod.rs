//! Shared helpers for the tests that run against a mock Spotify API.

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

use playlist_sorter::spotify::{RetryPolicy, SpotifyContext};

pub const TOKEN: &str = "test-token";

/// Context pointed at the mock server that retries twice without waiting.
pub fn context(server: &ServerGuard) -> SpotifyContext {
    SpotifyContext::new(TOKEN, server.url(), RetryPolicy::immediate(2)).unwrap()
}

/// Body of a `/me/playlists` page.
pub fn playlists_body(playlists: &[(&str, &str, u64)], next: Option<String>) -> String {
    let items: Vec<Value> = playlists
        .iter()
        .map(|(id, name, total)| json!({ "id": id, "name": name, "tracks": { "total": total } }))
        .collect();
    json!({ "items": items, "next": next }).to_string()
}

/// Body of a `/playlists/{id}/tracks` page restricted to track ids.
pub fn tracks_body<S: AsRef<str>>(ids: &[S]) -> String {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "track": { "id": id.as_ref() } }))
        .collect();
    json!({ "items": items }).to_string()
}

pub async fn mock_playlists(
    server: &mut ServerGuard,
    playlists: &[(&str, &str, u64)],
    hits: usize,
) -> Mock {
    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(playlists_body(playlists, None))
        .expect(hits)
        .create_async()
        .await
}

pub async fn mock_tracks_page<S: AsRef<str>>(
    server: &mut ServerGuard,
    playlist_id: &str,
    offset: u64,
    ids: &[S],
) -> Mock {
    server
        .mock("GET", format!("/playlists/{}/tracks", playlist_id).as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), offset.to_string()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
            Matcher::UrlEncoded("fields".into(), "items(track(id))".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tracks_body(ids))
        .expect(1)
        .create_async()
        .await
}

pub async fn mock_features(
    server: &mut ServerGuard,
    track_id: &str,
    features: Value,
) -> Mock {
    server
        .mock("GET", format!("/audio-features/{}", track_id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(features.to_string())
        .create_async()
        .await
}

pub fn track_ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}
