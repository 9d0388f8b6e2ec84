mod common;

use serde_json::json;

use playlist_sorter::error::Error;
use playlist_sorter::management::{sort_by_feature, sort_by_keys};
use playlist_sorter::types::{PlaylistItem, SortKey};

use common::*;

fn items(ids: &[&str]) -> Vec<PlaylistItem> {
    ids.iter().map(|id| PlaylistItem::new(id)).collect()
}

#[tokio::test]
async fn test_sorts_ascending_by_feature() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 5.0, "duration_ms": 1000 })).await;
    mock_features(&mut server, "b", json!({ "tempo": 1.0, "duration_ms": 1000 })).await;
    mock_features(&mut server, "c", json!({ "tempo": 3.0, "duration_ms": 1000 })).await;

    // Shuffling must not matter for the final order
    for _ in 0..5 {
        let outcome = sort_by_feature(&context(&server), items(&["a", "b", "c"]), "tempo", -1)
            .await
            .unwrap();

        let values: Vec<f64> = outcome.tracks.iter().map(|t| t.value).collect();
        let ids: Vec<&str> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(values, vec![1.0, 3.0, 5.0]);
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.total_duration_ms, 3000);
    }
}

#[tokio::test]
async fn test_length_budget_keeps_crossing_track() {
    let mut server = mockito::Server::new_async().await;
    for id in ["a", "b", "c"] {
        mock_features(&mut server, id, json!({ "energy": 0.5, "duration_ms": 100 })).await;
    }

    let outcome = sort_by_feature(&context(&server), items(&["a", "b", "c"]), "energy", 150)
        .await
        .unwrap();

    // 100 < 150, 200 >= 150: the second track crosses the budget and is kept
    assert_eq!(outcome.tracks.len(), 2);
    assert_eq!(outcome.total_duration_ms, 200);
}

#[tokio::test]
async fn test_no_budget_includes_every_track() {
    let mut server = mockito::Server::new_async().await;
    let ids = track_ids("t", 12);
    for id in &ids {
        mock_features(&mut server, id, json!({ "valence": 0.1, "duration_ms": 600_000 })).await;
    }

    let input: Vec<PlaylistItem> = ids.iter().map(|id| PlaylistItem::new(id)).collect();
    let outcome = sort_by_feature(&context(&server), input, "valence", -1)
        .await
        .unwrap();

    assert_eq!(outcome.tracks.len(), 12);
    assert_eq!(outcome.total_duration_ms, 12 * 600_000);
}

#[tokio::test]
async fn test_zero_budget_fetches_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/audio-features/a")
        .expect(0)
        .create_async()
        .await;

    let outcome = sort_by_feature(&context(&server), items(&["a"]), "tempo", 0)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(outcome.tracks.is_empty());
}

#[tokio::test]
async fn test_failed_feature_fetch_is_skipped() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 120.0, "duration_ms": 1000 })).await;
    server
        .mock("GET", "/audio-features/b")
        .with_status(404)
        .create_async()
        .await;
    mock_features(&mut server, "c", json!({ "tempo": 90.0, "duration_ms": 1000 })).await;

    let outcome = sort_by_feature(&context(&server), items(&["a", "b", "c"]), "tempo", -1)
        .await
        .unwrap();

    let ids: Vec<&str> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.total_duration_ms, 2000);
}

#[tokio::test]
async fn test_tracks_without_id_are_skipped() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 1.0, "duration_ms": 10 })).await;

    let mut input = items(&["a"]);
    input.push(PlaylistItem { track: None });

    let outcome = sort_by_feature(&context(&server), input, "tempo", -1)
        .await
        .unwrap();

    assert_eq!(outcome.tracks.len(), 1);
    assert_eq!(outcome.skipped, 1);
}

#[tokio::test]
async fn test_missing_feature_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 1.0, "duration_ms": 10 })).await;

    let result = sort_by_feature(&context(&server), items(&["a"]), "tempoo", -1).await;

    match result {
        Err(Error::FeatureMissing { track_id, feature }) => {
            assert_eq!(track_id, "a");
            assert_eq!(feature, "tempoo");
        }
        other => panic!("expected FeatureMissing, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_numeric_feature_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    mock_features(
        &mut server,
        "a",
        json!({ "analysis_url": "https://example.com", "duration_ms": 10 }),
    )
    .await;

    let result = sort_by_feature(&context(&server), items(&["a"]), "analysis_url", -1).await;
    assert!(matches!(result, Err(Error::FeatureNotNumeric { .. })));
}

#[tokio::test]
async fn test_malformed_features_are_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/audio-features/a")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result = sort_by_feature(&context(&server), items(&["a"]), "tempo", -1).await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_duration_can_be_the_sort_key() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "duration_ms": 300 })).await;
    mock_features(&mut server, "b", json!({ "duration_ms": 200 })).await;

    let outcome = sort_by_feature(&context(&server), items(&["a", "b"]), "duration_ms", -1)
        .await
        .unwrap();

    let ids: Vec<&str> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn test_duplicate_track_kept_once_with_last_value() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/audio-features/a")
        .with_status(200)
        .with_body(json!({ "tempo": 200.0, "duration_ms": 100 }).to_string())
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/audio-features/a")
        .with_status(200)
        .with_body(json!({ "tempo": 50.0, "duration_ms": 100 }).to_string())
        .expect(1)
        .create_async()
        .await;
    mock_features(&mut server, "b", json!({ "tempo": 100.0, "duration_ms": 100 })).await;

    let outcome = sort_by_feature(&context(&server), items(&["a", "b", "a"]), "tempo", -1)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<&str> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(outcome.tracks[0].value, 50.0);
    // Every occurrence counts towards the length
    assert_eq!(outcome.total_duration_ms, 300);
}

#[tokio::test]
async fn test_huge_durations_saturate() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 1.0, "duration_ms": 1e30 })).await;
    mock_features(&mut server, "b", json!({ "tempo": 2.0, "duration_ms": 1e30 })).await;

    let outcome = sort_by_feature(&context(&server), items(&["a", "b"]), "tempo", -1)
        .await
        .unwrap();

    assert_eq!(outcome.tracks.len(), 2);
    assert_eq!(outcome.total_duration_ms, u64::MAX);
}

#[tokio::test]
async fn test_secondary_keys_break_ties() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 120.0, "energy": 0.2, "valence": 0.9, "duration_ms": 1000 })).await;
    mock_features(&mut server, "b", json!({ "tempo": 120.0, "energy": 0.8, "valence": 0.1, "duration_ms": 1000 })).await;
    mock_features(&mut server, "c", json!({ "tempo": 120.0, "energy": 0.2, "valence": 0.4, "duration_ms": 1000 })).await;
    mock_features(&mut server, "d", json!({ "tempo": 90.0, "energy": 0.9, "valence": 0.9, "duration_ms": 1000 })).await;

    let then = vec![
        SortKey {
            feature: "energy".to_string(),
            descending: true,
        },
        SortKey {
            feature: "valence".to_string(),
            descending: false,
        },
    ];

    for _ in 0..5 {
        let outcome = sort_by_keys(
            &context(&server),
            items(&["a", "b", "c", "d"]),
            "tempo",
            &then,
            -1,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        assert_eq!(outcome.tracks[1].then, vec![0.8, 0.1]);
    }
}

#[tokio::test]
async fn test_missing_secondary_key_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    mock_features(&mut server, "a", json!({ "tempo": 120.0, "duration_ms": 1000 })).await;

    let then = vec![SortKey {
        feature: "energy".to_string(),
        descending: false,
    }];
    let result = sort_by_keys(&context(&server), items(&["a"]), "tempo", &then, -1).await;

    match result {
        Err(Error::FeatureMissing { track_id, feature }) => {
            assert_eq!(track_id, "a");
            assert_eq!(feature, "energy");
        }
        other => panic!("expected FeatureMissing, got {:?}", other),
    }
}
