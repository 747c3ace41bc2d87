//! Narrator: at most one utterance at a time
//!
//! Wraps a `SpeechEngine` with voice selection and the interrupt policy:
//! anything still being spoken is cancelled before a new phrase starts.

use breathe_types::AudioSettings;

use super::engine::SpeechEngine;
use super::voice::{PreferredVoiceSelector, VoiceSelector};

pub struct Narrator<E, S = PreferredVoiceSelector> {
    engine: E,
    selector: S,
}

impl<E: SpeechEngine> Narrator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            selector: PreferredVoiceSelector,
        }
    }
}

impl<E: SpeechEngine, S: VoiceSelector> Narrator<E, S> {
    pub fn with_selector(engine: E, selector: S) -> Self {
        Self { engine, selector }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Speak `text` with the voice best matching `settings`.
    ///
    /// Returns false when narration was skipped (no voices, engine error).
    pub fn speak(&mut self, text: &str, settings: &AudioSettings) -> bool {
        self.cancel();

        let voices = self.engine.voices();
        let selected = self
            .selector
            .select(&voices, &settings.locale, settings.voice)
            .and_then(|index| voices.get(index));
        let Some(voice) = selected else {
            tracing::debug!(text, "No narrator voice available, skipping");
            return false;
        };

        match self.engine.speak(voice, text) {
            Ok(()) => {
                tracing::debug!(text, voice = %voice.name, "Narrating");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, text, "Narration failed");
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.engine.is_speaking() {
            self.engine.cancel();
        }
    }
}
