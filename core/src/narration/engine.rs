//! Host speech capability

use thiserror::Error;

use super::voice::Voice;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech engine failed to speak")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to launch speech process")]
    Spawn(#[source] std::io::Error),
}

/// Text-to-speech provided by the host platform.
///
/// Implementations must not block until the utterance finishes; `speak`
/// starts speaking and returns.
pub trait SpeechEngine: Send {
    fn voices(&self) -> Vec<Voice>;

    fn speak(&mut self, voice: &Voice, text: &str) -> Result<(), SpeechError>;

    /// Stop the current utterance, if any.
    fn cancel(&mut self);

    fn is_speaking(&self) -> bool;
}

/// Engine for hosts without speech support. Every call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechEngine for SilentSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&mut self, _voice: &Voice, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }

    fn cancel(&mut self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}
