//! Host text-to-speech for narration
//!
//! Uses the `tts` crate on Windows/macOS. Linux speaks through an `espeak`
//! subprocess, killed to cancel an utterance.

use std::sync::Arc;

use breathe_core::config::AudioSettings;
use breathe_core::narration::{
    NarrationCommand, NarrationService, Narrator, SilentSpeech, SpeechEngine, SpeechError, Voice,
};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechMode {
    System,
    Silent,
}

/// Start the narration service on its own task.
pub fn spawn_narration(
    mode: SpeechMode,
    command_rx: mpsc::Receiver<NarrationCommand>,
    settings: Arc<RwLock<AudioSettings>>,
) -> JoinHandle<()> {
    match mode {
        SpeechMode::System => tokio::spawn(async move {
            // Engine setup probes the host synchronously
            let engine = match tokio::task::spawn_blocking(SystemSpeech::new).await {
                Ok(engine) => engine,
                Err(e) => {
                    tracing::warn!(error = %e, "Speech engine setup failed, narration disabled");
                    return;
                }
            };
            NarrationService::new(command_rx, settings, Narrator::new(engine))
                .run()
                .await;
        }),
        SpeechMode::Silent => {
            let service = NarrationService::new(command_rx, settings, Narrator::new(SilentSpeech));
            tokio::spawn(service.run())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Windows / macOS
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(target_os = "linux"))]
pub struct SystemSpeech {
    /// None if initialization failed
    tts: Option<tts::Tts>,
    voices: Vec<(Voice, tts::Voice)>,
}

#[cfg(not(target_os = "linux"))]
impl SystemSpeech {
    pub fn new() -> Self {
        use breathe_core::narration::VoiceGender;

        let Ok(mut engine) = tts::Tts::default() else {
            tracing::warn!("Text-to-speech unavailable, narration disabled");
            return Self {
                tts: None,
                voices: Vec::new(),
            };
        };
        let _ = engine.set_rate(engine.normal_rate());

        let default_id = engine.voice().ok().flatten().map(|v| v.id());
        let voices = engine
            .voices()
            .unwrap_or_default()
            .into_iter()
            .map(|tv| {
                let mut voice = Voice::new(tv.id(), tv.name(), tv.language().to_string());
                voice.gender = match tv.gender() {
                    Some(tts::Gender::Female) => Some(VoiceGender::Female),
                    Some(tts::Gender::Male) => Some(VoiceGender::Male),
                    None => None,
                };
                voice.is_default = default_id.as_deref() == Some(voice.id.as_str());
                (voice, tv)
            })
            .collect();

        Self {
            tts: Some(engine),
            voices,
        }
    }
}

#[cfg(not(target_os = "linux"))]
impl SpeechEngine for SystemSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.iter().map(|(voice, _)| voice.clone()).collect()
    }

    fn speak(&mut self, voice: &Voice, text: &str) -> Result<(), SpeechError> {
        let Some(tts) = self.tts.as_mut() else {
            return Ok(());
        };
        if let Some((_, native)) = self.voices.iter().find(|(v, _)| v.id == voice.id) {
            let _ = tts.set_voice(native);
        }
        tts.speak(text, true)
            .map(|_| ())
            .map_err(|e| SpeechError::Engine(Box::new(e)))
    }

    fn cancel(&mut self) {
        if let Some(tts) = self.tts.as_mut() {
            let _ = tts.stop();
        }
    }

    fn is_speaking(&self) -> bool {
        self.tts
            .as_ref()
            .and_then(|tts| tts.is_speaking().ok())
            .unwrap_or(false)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Linux
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
pub struct SystemSpeech {
    available: bool,
    child: Option<std::process::Child>,
}

#[cfg(target_os = "linux")]
impl SystemSpeech {
    pub fn new() -> Self {
        use std::process::{Command, Stdio};

        let available = Command::new("espeak")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        if !available {
            tracing::warn!("espeak not found, narration disabled");
        }

        Self {
            available,
            child: None,
        }
    }
}

#[cfg(target_os = "linux")]
impl SpeechEngine for SystemSpeech {
    fn voices(&self) -> Vec<Voice> {
        use breathe_core::narration::VoiceGender;

        if !self.available {
            return Vec::new();
        }
        // espeak variants: "+f3"/"+m3" select a female/male rendition
        vec![
            Voice::new("en-us", "English (America)", "en-US").as_default(),
            Voice::new("en-us+f3", "English (America) female", "en-US").with_gender(VoiceGender::Female),
            Voice::new("en-us+m3", "English (America) male", "en-US").with_gender(VoiceGender::Male),
            Voice::new("en-gb+f3", "English (Great Britain) female", "en-GB").with_gender(VoiceGender::Female),
            Voice::new("en-gb+m3", "English (Great Britain) male", "en-GB").with_gender(VoiceGender::Male),
        ]
    }

    fn speak(&mut self, voice: &Voice, text: &str) -> Result<(), SpeechError> {
        use std::process::{Command, Stdio};

        let child = Command::new("espeak")
            .arg("-v")
            .arg(&voice.id)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(SpeechError::Spawn)?;
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_speaking(&self) -> bool {
        // A finished child is reaped by the next cancel
        self.child.is_some()
    }
}

#[cfg(target_os = "linux")]
impl Drop for SystemSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathe_core::narration::create_narration_channel;

    #[tokio::test]
    async fn narration_task_ends_when_senders_close() {
        let (tx, rx) = create_narration_channel();
        let settings = Arc::new(RwLock::new(AudioSettings {
            enabled: false,
            ..Default::default()
        }));
        let handle = spawn_narration(SpeechMode::System, rx, settings);

        tx.send(NarrationCommand::Speak {
            text: "Breath in".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        handle.await.unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dropping_engine_kills_running_utterance() {
        use std::process::{Command, Stdio};

        let child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let pid = child.id().to_string();
        let speech = SystemSpeech {
            available: true,
            child: Some(child),
        };
        assert!(speech.is_speaking());

        drop(speech);

        let alive = Command::new("kill")
            .args(["-0", &pid])
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(!alive.success());
    }
}
