use std::sync::Arc;

use breathe_core::config::{AppConfig, AppConfigExt, VoicePreference};
use breathe_core::offline::{
    CacheStorage, DetachedHost, HttpFetcher, MemoryCacheStorage, OfflineWorker,
    ResourceInterceptor, WorkerConfig,
};
use breathe_core::session::SessionError;

use crate::CliContext;
use crate::render::format_snapshot;

pub async fn start(ctx: &CliContext) {
    match ctx.session.start().await {
        Ok(()) => {}
        Err(SessionError::AlreadyActive) => println!("A session is already running"),
        Err(e) => println!("{e}"),
    }
}

pub async fn stop(ctx: &CliContext) {
    match ctx.session.stop().await {
        Ok(()) => {}
        Err(SessionError::NotActive) => println!("No session is running"),
        Err(e) => println!("{e}"),
    }
}

pub async fn toggle(ctx: &CliContext) {
    let snapshot = ctx.session.toggle().await;
    println!("[{}]", snapshot.toggle_label());
}

pub async fn show_status(ctx: &CliContext) {
    let snapshot = ctx.session.snapshot().await;
    let voice = ctx.audio.read().await.voice;
    println!("{}", format_snapshot(&snapshot));
    println!("voice: {voice}");
}

pub async fn set_voice(ctx: &CliContext, preference: VoicePreference) -> Result<(), String> {
    ctx.audio.write().await.voice = preference;

    let mut config = ctx.config.write().await;
    config.audio.voice = preference;
    config.save().map_err(|e| e.to_string())?;

    println!("Narrator voice set to {preference}");
    Ok(())
}

pub async fn show_settings(ctx: &CliContext) {
    let config = ctx.config.read().await;

    match AppConfig::path() {
        Ok(path) => println!("config file: {}", path.display()),
        Err(e) => println!("config file: unknown ({e})"),
    }

    let pattern = &config.pattern;
    println!(
        "pattern:     {}-{}-{} x {} rounds",
        pattern.inhale_secs, pattern.hold_secs, pattern.exhale_secs, pattern.total_rounds
    );
    println!(
        "narration:   {} ({} voice, {})",
        if config.audio.enabled { "on" } else { "off" },
        config.audio.voice,
        config.audio.locale
    );
    println!("offline:     {} @ {}", config.offline.cache_name, config.offline.origin);
}

/// Install and activate the offline worker against a live origin and
/// report what it would serve without a network.
pub async fn precache(ctx: &CliContext, origin: Option<&str>) -> Result<(), String> {
    let mut settings = ctx.config.read().await.offline.clone();
    if let Some(origin) = origin {
        settings.origin = origin.to_string();
    }

    let config = WorkerConfig::from_settings(&settings).map_err(|e| e.to_string())?;
    let storage = Arc::new(MemoryCacheStorage::new());
    let worker = OfflineWorker::new(config, Arc::clone(&storage), HttpFetcher::new());

    let report = worker.on_install(&DetachedHost).await;
    worker.on_activate(&DetachedHost).await;

    if let Some(error) = report.error {
        return Err(format!("precache into {} failed: {error}", report.cache_name));
    }

    println!("cached {} entries into {}", report.cached, report.cache_name);
    let entries = storage
        .entries(&report.cache_name)
        .await
        .map_err(|e| e.to_string())?;
    for key in entries {
        println!("  {} {}", key.method(), key.url());
    }
    Ok(())
}

pub fn exit() {
    println!("quitting...");
}
