//! Offline asset cache worker
//!
//! Intercepts resource loads for the installed application so its shell
//! keeps working without a network.
//!
//! # Lifecycle
//!
//! 1. `on_install` → precache the manifest into the versioned store
//! 2. `on_activate` → delete stores from older versions, claim clients
//! 3. `on_fetch` → answer each request, network-first for navigations and
//!    cache-first for everything else

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use tokio::sync::RwLock;

use breathe_types::OfflineSettings;

use super::cache::CacheStorage;
use super::error::{CacheError, FetchError};
use super::fetch::Fetcher;
use super::manifest::{CACHE_VERSION, PRECACHE_MANIFEST, ROOT_DOCUMENT};
use super::request::{CacheKey, CacheMode, Request, Response};

/// Capabilities the hosting environment grants the worker.
pub trait WorkerHost: Send + Sync {
    /// Activate as soon as installation finishes instead of waiting for
    /// existing clients to close.
    fn skip_waiting(&self);

    /// Take control of already-open clients.
    fn claim_clients(&self);
}

/// Host with no clients to wait for or claim (command-line use).
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl WorkerHost for DetachedHost {
    fn skip_waiting(&self) {}

    fn claim_clients(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Current versioned store name
    pub cache_name: String,
    /// Origin the manifest paths resolve against
    pub origin: Url,
    /// Absolute paths precached on install
    pub precache: Vec<String>,
}

impl WorkerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            cache_name: CACHE_VERSION.to_string(),
            origin,
            precache: PRECACHE_MANIFEST.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn from_settings(settings: &OfflineSettings) -> Result<Self, CacheError> {
        let origin = Url::parse(&settings.origin).map_err(|e| CacheError::InvalidPath {
            path: settings.origin.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            cache_name: settings.cache_name.clone(),
            ..Self::new(origin)
        })
    }

    pub fn resolve(&self, path: &str) -> Result<Url, CacheError> {
        self.origin.join(path).map_err(|e| CacheError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn root_key(&self) -> Option<CacheKey> {
        self.origin.join(ROOT_DOCUMENT).ok().map(|url| CacheKey::get(&url))
    }
}

/// Outcome of `on_install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache_name: String,
    /// Entries written to the store
    pub cached: usize,
    /// Why precaching failed, if it did; installation completes regardless
    pub error: Option<String>,
}

/// The three callback slots a host dispatches to.
#[async_trait]
pub trait ResourceInterceptor: Send + Sync {
    async fn on_install(&self, host: &dyn WorkerHost) -> InstallReport;

    /// Returns the names of the stores that were deleted.
    async fn on_activate(&self, host: &dyn WorkerHost) -> Vec<String>;

    async fn on_fetch(&self, request: Request) -> Result<Response, FetchError>;
}

pub struct OfflineWorker<S, F> {
    config: WorkerConfig,
    storage: Arc<S>,
    fetcher: F,
    state: RwLock<WorkerState>,
}

impl<S: CacheStorage, F: Fetcher> OfflineWorker<S, F> {
    pub fn new(config: WorkerConfig, storage: Arc<S>, fetcher: F) -> Self {
        Self {
            config,
            storage,
            fetcher,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        *self.state.write().await = state;
    }

    /// Fetch the whole manifest from the network, then write it in one batch.
    async fn precache(&self) -> Result<usize, CacheError> {
        let name = &self.config.cache_name;
        self.storage.open(name).await?;

        let mut entries = Vec::with_capacity(self.config.precache.len());
        for path in &self.config.precache {
            let url = self.config.resolve(path)?;
            let request = Request::get(url).with_cache(CacheMode::Reload);
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|source| CacheError::Precache {
                    url: request.url.to_string(),
                    source,
                })?;
            if !response.is_ok() {
                return Err(CacheError::BadStatus {
                    url: request.url.to_string(),
                    status: response.status,
                });
            }
            entries.push((request.key(), response));
        }

        let count = entries.len();
        self.storage.put_all(name, entries).await?;
        Ok(count)
    }

    async fn lookup(&self, key: &CacheKey) -> Option<Response> {
        match self.storage.match_in(&self.config.cache_name, key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, url = key.url(), "Cache lookup failed");
                None
            }
        }
    }

    async fn store(&self, request: &Request, response: Response) {
        if let Err(e) = self
            .storage
            .put(&self.config.cache_name, request.key(), response)
            .await
        {
            tracing::warn!(error = %e, url = %request.url, "Failed to cache response");
        }
    }

    /// Navigations: live page when reachable, cached copy when not.
    async fn network_first(&self, request: Request) -> Result<Response, FetchError> {
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.store(&request, response.clone()).await;
                }
                Ok(response)
            }
            Err(e) => {
                tracing::debug!(error = %e, url = %request.url, "Navigation offline, trying cache");
                if let Some(cached) = self.lookup(&request.key()).await {
                    return Ok(cached);
                }
                if let Some(root) = self.config.root_key() {
                    if let Some(cached) = self.lookup(&root).await {
                        return Ok(cached);
                    }
                }
                Err(FetchError::Offline {
                    url: request.url.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Subresources: cached copy when present, otherwise fetch and keep.
    async fn cache_first(&self, request: Request) -> Result<Response, FetchError> {
        if let Some(cached) = self.lookup(&request.key()).await {
            return Ok(cached);
        }

        let response = self.fetcher.fetch(&request).await.inspect_err(|e| {
            tracing::error!(error = %e, "Offline worker fetch error");
        })?;
        if response.is_cacheable() {
            self.store(&request, response.clone()).await;
        }
        Ok(response)
    }
}

#[async_trait]
impl<S: CacheStorage, F: Fetcher> ResourceInterceptor for OfflineWorker<S, F> {
    async fn on_install(&self, host: &dyn WorkerHost) -> InstallReport {
        host.skip_waiting();
        self.set_state(WorkerState::Installing).await;

        let report = match self.precache().await {
            Ok(cached) => {
                tracing::info!(cache = %self.config.cache_name, cached, "Opened cache and cached initial assets");
                InstallReport {
                    cache_name: self.config.cache_name.clone(),
                    cached,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(cache = %self.config.cache_name, error = %e, "Failed to open cache or add initial URLs");
                InstallReport {
                    cache_name: self.config.cache_name.clone(),
                    cached: 0,
                    error: Some(e.to_string()),
                }
            }
        };

        self.set_state(WorkerState::Installed).await;
        report
    }

    async fn on_activate(&self, host: &dyn WorkerHost) -> Vec<String> {
        self.set_state(WorkerState::Activating).await;

        let mut deleted = Vec::new();
        match self.storage.keys().await {
            Ok(names) => {
                for name in names.into_iter().filter(|n| *n != self.config.cache_name) {
                    match self.storage.delete(&name).await {
                        Ok(true) => {
                            tracing::info!(cache = %name, "Deleting old cache");
                            deleted.push(name);
                        }
                        Ok(false) => {}
                        Err(e) => tracing::warn!(cache = %name, error = %e, "Failed to delete old cache"),
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to list caches"),
        }

        host.claim_clients();
        self.set_state(WorkerState::Activated).await;
        deleted
    }

    async fn on_fetch(&self, request: Request) -> Result<Response, FetchError> {
        if request.method != Method::GET {
            return self.fetcher.fetch(&request).await;
        }

        if request.is_navigation() {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }
}
