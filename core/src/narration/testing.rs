//! In-memory speech engine that records every call

use std::sync::{Arc, Mutex};

use super::engine::{SpeechEngine, SpeechError};
use super::voice::Voice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCall {
    Speak { voice_id: String, text: String },
    Cancel,
}

#[derive(Clone)]
pub struct RecordingSpeech {
    voices: Vec<Voice>,
    calls: Arc<Mutex<Vec<SpeechCall>>>,
    speaking: Arc<Mutex<bool>>,
}

impl RecordingSpeech {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            calls: Arc::default(),
            speaking: Arc::default(),
        }
    }

    pub fn english() -> Self {
        Self::new(vec![
            Voice::new("en-f", "Samantha", "en-US"),
            Voice::new("en-m", "Daniel", "en-GB"),
        ])
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SpeechCall::Speak { text, .. } => Some(text),
                SpeechCall::Cancel => None,
            })
            .collect()
    }
}

impl SpeechEngine for RecordingSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, voice: &Voice, text: &str) -> Result<(), SpeechError> {
        self.calls.lock().unwrap().push(SpeechCall::Speak {
            voice_id: voice.id.clone(),
            text: text.to_string(),
        });
        // Utterances never finish on their own here
        *self.speaking.lock().unwrap() = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.calls.lock().unwrap().push(SpeechCall::Cancel);
        *self.speaking.lock().unwrap() = false;
    }

    fn is_speaking(&self) -> bool {
        *self.speaking.lock().unwrap()
    }
}
