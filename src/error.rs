//! Error types shared by every stage of a sort run.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to Spotify or sorting tracks.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or an unusable HTTP client.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status that is not worth retrying.
    #[error("{url} returned {status}")]
    Status { status: StatusCode, url: String },

    /// The API asked us to wait longer than we are willing to.
    #[error("rate limited by {url}, retry after {retry_after} seconds")]
    RateLimited { url: String, retry_after: u64 },

    /// Every attempt allowed by the retry policy failed.
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// A successful response carried a body we could not parse.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot find playlist {0:?}")]
    PlaylistNotFound(String),

    /// The feature vector of a track has no value for the requested feature.
    #[error("track {track_id} has no feature named {feature:?}")]
    FeatureMissing { track_id: String, feature: String },

    #[error("feature {feature:?} of track {track_id} is not a number")]
    FeatureNotNumeric { track_id: String, feature: String },
}

impl Error {
    /// Whether the error came from the remote service rather than from the
    /// data it returned. Only these errors may be skipped by the sorter.
    pub fn is_api_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::Status { .. }
                | Error::RateLimited { .. }
                | Error::RetriesExhausted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
