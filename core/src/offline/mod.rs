//! Offline asset cache worker
//!
//! Keeps the installed application's shell usable without a network:
//! a versioned named cache store, populated on install, garbage-collected on
//! activate and consulted on every GET.

mod cache;
mod error;
mod fetch;
mod manifest;
mod request;
mod worker;


pub use cache::{CacheStorage, MemoryCacheStorage};
pub use error::{CacheError, FetchError};
pub use fetch::{Fetcher, HttpFetcher};
pub use manifest::{CACHE_VERSION, PRECACHE_MANIFEST, ROOT_DOCUMENT};
pub use request::{CacheKey, CacheMode, Request, RequestMode, Response};
pub use worker::{
    DetachedHost, InstallReport, OfflineWorker, ResourceInterceptor, WorkerConfig, WorkerHost,
    WorkerState,
};
