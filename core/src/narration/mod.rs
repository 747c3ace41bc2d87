//! Narration subsystem
//!
//! Speaks the phase cues chosen by the session:
//! - **Voices**: host voice catalog and the selection strategy
//! - **Engine**: the host text-to-speech capability (or silence)
//! - **Narrator**: cancel-before-speak policy over an engine
//! - **Service**: background task fed by the session controller

mod engine;
mod narrator;
mod service;
mod voice;

#[cfg(test)]
pub(crate) mod testing;


pub use engine::{SilentSpeech, SpeechEngine, SpeechError};
pub use narrator::Narrator;
pub use service::{NarrationCommand, NarrationSender, NarrationService, create_narration_channel};
pub use voice::{PreferredVoiceSelector, Voice, VoiceGender, VoiceSelector};
