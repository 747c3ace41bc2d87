//! Narration service
//!
//! Runs in a background task, receiving `NarrationCommand`s via channel.
//! The session controller fires commands and never waits on speech.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use breathe_types::AudioSettings;

use super::engine::SpeechEngine;
use super::narrator::Narrator;
use super::voice::VoiceSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationCommand {
    /// Speak text, interrupting the current utterance
    Speak { text: String },
    /// Silence the current utterance
    Cancel,
}

/// Sender handle for narration commands
pub type NarrationSender = mpsc::Sender<NarrationCommand>;

/// Create a new narration channel
pub fn create_narration_channel() -> (NarrationSender, mpsc::Receiver<NarrationCommand>) {
    // A session produces at most a couple of commands per second
    mpsc::channel(64)
}

pub struct NarrationService<E, S> {
    command_rx: mpsc::Receiver<NarrationCommand>,

    /// Shared audio settings (voice preference can change mid-session)
    settings: Arc<RwLock<AudioSettings>>,

    narrator: Narrator<E, S>,
}

impl<E: SpeechEngine, S: VoiceSelector> NarrationService<E, S> {
    pub fn new(
        command_rx: mpsc::Receiver<NarrationCommand>,
        settings: Arc<RwLock<AudioSettings>>,
        narrator: Narrator<E, S>,
    ) -> Self {
        Self {
            command_rx,
            settings,
            narrator,
        }
    }

    /// Process commands until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            match command {
                NarrationCommand::Speak { text } => {
                    // Clone and drop the guard before touching the engine
                    let settings = self.settings.read().await.clone();
                    if !settings.enabled {
                        self.narrator.cancel();
                        continue;
                    }
                    self.narrator.speak(&text, &settings);
                }
                NarrationCommand::Cancel => self.narrator.cancel(),
            }
        }

        self.narrator.cancel();
        tracing::debug!("Narration service stopped");
    }
}
