use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<SimplePlaylist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplePlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

/// A playlist found by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    pub total: u64,
}

impl From<SimplePlaylist> for PlaylistRef {
    fn from(playlist: SimplePlaylist) -> Self {
        PlaylistRef {
            id: playlist.id,
            name: playlist.name,
            total: playlist.tracks.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
}

/// One entry of a playlist as returned by the paginated track listing.
///
/// Local files and tracks removed from the catalog come back with a null
/// track or a null id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackRef>,
}

impl PlaylistItem {
    pub fn new(id: &str) -> Self {
        PlaylistItem {
            track: Some(TrackRef {
                id: Some(id.to_string()),
            }),
        }
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().and_then(|t| t.id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: Option<String>,
}

/// Audio features of a single track, keyed by feature name.
///
/// Kept as a loose map so any numeric feature the API returns can be used
/// as a sort key without this crate knowing its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub Map<String, Value>);

impl FeatureVector {
    pub fn value(&self, track_id: &str, feature: &str) -> Result<f64> {
        let value = self.0.get(feature).ok_or_else(|| Error::FeatureMissing {
            track_id: track_id.to_string(),
            feature: feature.to_string(),
        })?;

        value.as_f64().ok_or_else(|| Error::FeatureNotNumeric {
            track_id: track_id.to_string(),
            feature: feature.to_string(),
        })
    }

    pub fn duration_ms(&self, track_id: &str) -> Result<u64> {
        let duration = self.value(track_id, "duration_ms")?;
        Ok(duration.max(0.0) as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

/// A secondary sort key, consulted only when every earlier key ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub feature: String,
    pub descending: bool,
}

/// A track together with the feature values it was sorted by.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedTrack {
    pub id: String,
    /// Value of the primary feature.
    pub value: f64,
    /// Values of the secondary keys, in key order.
    pub then: Vec<f64>,
}

#[derive(Tabled)]
pub struct SortedTableRow {
    pub position: usize,
    pub track: String,
    pub value: f64,
}
