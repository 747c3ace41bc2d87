use std::sync::Arc;
use std::time::Duration;

use breathe_core::config::{AppConfig, AppConfigExt, AudioSettings};
use breathe_core::narration::create_narration_channel;
use breathe_core::session::{SessionChannels, SessionController};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::speech::{self, SpeechMode};

/// Tasks that live as long as the CLI.
#[derive(Default)]
pub struct BackgroundTasks {
    pub narration: Option<JoinHandle<()>>,
    pub renderer: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Abort every task and wait for each to unwind, so the speech engine
    /// is dropped (and any utterance silenced) before the process exits.
    pub async fn abort_all(&mut self) {
        for handle in [self.renderer.take(), self.narration.take()].into_iter().flatten() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in breathe-core.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    /// Audio settings shared with the narration service
    pub audio: Arc<RwLock<AudioSettings>>,
    pub session: SessionController,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl CliContext {
    /// Load config, start narration and build the session controller.
    ///
    /// Returns the session channels for the renderer to consume.
    pub fn new(tick_period: Duration, speech: SpeechMode) -> (Self, SessionChannels) {
        let config = AppConfig::load();
        let audio = Arc::new(RwLock::new(config.audio.clone()));

        let (narration_tx, narration_rx) = create_narration_channel();
        let narration = speech::spawn_narration(speech, narration_rx, Arc::clone(&audio));

        let (session, channels) = SessionController::new(config.pattern, tick_period, narration_tx);

        let ctx = Self {
            config: Arc::new(RwLock::new(config)),
            audio,
            session,
            tasks: Arc::new(Mutex::new(BackgroundTasks {
                narration: Some(narration),
                renderer: None,
            })),
        };
        (ctx, channels)
    }

    /// Stop the session and background tasks.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
        self.tasks.lock().await.abort_all().await;
    }
}
