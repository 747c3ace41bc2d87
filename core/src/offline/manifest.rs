//! Precache manifest
//!
//! The application shell that must load without a network. Change
//! `CACHE_VERSION` whenever this list changes so the next activation
//! garbage-collects the old store.

pub use breathe_types::DEFAULT_CACHE_NAME as CACHE_VERSION;

/// Root document; navigation falls back to it when offline.
pub const ROOT_DOCUMENT: &str = "/";

pub const PRECACHE_MANIFEST: &[&str] = &[
    ROOT_DOCUMENT,
    "/manifest.json",
    "/icons/icon-192x192.png",
    "/icons/icon-512x512.png",
    "/icons/icon-maskable-192x192.png",
    "/icons/icon-maskable-512x512.png",
    "/icons/apple-touch-icon.png",
    "/icons/apple-touch-icon-152x152.png",
    "/icons/apple-touch-icon-180x180.png",
    "/icons/apple-touch-icon-167x167.png",
    "/icons/mstile-70x70.png",
    "/icons/mstile-150x150.png",
    "/icons/mstile-310x150.png",
    "/icons/mstile-310x310.png",
    "/favicon.ico",
];
