//! Network access for the worker

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};

use super::error::FetchError;
use super::request::{CacheMode, Request, Response};

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Fetches over HTTP(S) with reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        if !matches!(request.url.scheme(), "http" | "https") {
            return Err(FetchError::Unreachable {
                url: request.url.to_string(),
                reason: format!("unsupported scheme '{}'", request.url.scheme()),
            });
        }

        let network = |source| FetchError::Network {
            url: request.url.to_string(),
            source,
        };

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        if request.cache == CacheMode::Reload {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = builder.send().await.map_err(network)?;
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(network)?;

        tracing::debug!(%url, %status, bytes = body.len(), "Fetched");

        Ok(Response {
            status,
            url,
            headers,
            body: body.to_vec(),
        })
    }
}
