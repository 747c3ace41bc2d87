//! Error types for the offline cache worker

use reqwest::StatusCode;
use thiserror::Error;

/// A resource could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network request for {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    /// A navigation failed and no cached page could stand in for it.
    #[error("{url} is offline and not cached")]
    Offline {
        url: String,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. }
            | FetchError::Unreachable { url, .. }
            | FetchError::Offline { url, .. } => url,
        }
    }
}

/// Errors from cache store operations and precaching.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store '{name}' is unavailable: {reason}")]
    Store { name: String, reason: String },

    #[error("invalid precache path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("failed to precache {url}")]
    Precache {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("precache of {url} returned {status}")]
    BadStatus { url: String, status: StatusCode },
}
