//! Shared session and configuration types for BreatheEasy
//!
//! This crate contains serializable types shared between the session engine
//! (breathe-core) and any front end that renders it (the terminal CLI today).

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Phases
// ─────────────────────────────────────────────────────────────────────────────

/// One stage of the breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// Spoken cue for entering this phase. Idle has none.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Phase::Idle => None,
            Phase::Inhale => Some("Breath in"),
            Phase::Hold => Some("Hold breath"),
            Phase::Exhale => Some("Breath out"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Breathing Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// Phase durations and round count for a session.
///
/// Read once at startup; a running process never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    #[serde(default = "default_inhale_secs")]
    pub inhale_secs: u32,
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u32,
    #[serde(default = "default_exhale_secs")]
    pub exhale_secs: u32,
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,
}

fn default_inhale_secs() -> u32 {
    4
}

fn default_hold_secs() -> u32 {
    7
}

fn default_exhale_secs() -> u32 {
    8
}

fn default_total_rounds() -> u32 {
    10
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self {
            inhale_secs: default_inhale_secs(),
            hold_secs: default_hold_secs(),
            exhale_secs: default_exhale_secs(),
            total_rounds: default_total_rounds(),
        }
    }
}

impl BreathingPattern {
    /// Full duration of `phase` in seconds (0 for Idle).
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle => 0,
            Phase::Inhale => self.inhale_secs,
            Phase::Hold => self.hold_secs,
            Phase::Exhale => self.exhale_secs,
        }
    }

    /// Seconds in one Inhale→Hold→Exhale round.
    pub fn round_secs(&self) -> u32 {
        self.inhale_secs + self.hold_secs + self.exhale_secs
    }

    /// Every duration and the round count must be non-zero.
    pub fn is_valid(&self) -> bool {
        self.inhale_secs > 0 && self.hold_secs > 0 && self.exhale_secs > 0 && self.total_rounds > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// What a front end needs to render the session after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub countdown: u32,
    pub rounds_completed: u32,
    pub total_rounds: u32,
    pub is_active: bool,
}

impl SessionSnapshot {
    pub fn remaining_rounds(&self) -> u32 {
        self.total_rounds.saturating_sub(self.rounds_completed)
    }

    /// Caption under the countdown ("Ready?" while idle).
    pub fn label(&self) -> &'static str {
        if self.phase.is_idle() {
            "Ready?"
        } else {
            self.phase.name()
        }
    }

    /// Progress is shown while running, and after a run that made progress.
    pub fn show_progress(&self) -> bool {
        self.is_active || (self.rounds_completed > 0 && self.phase.is_idle())
    }

    /// Label for the single start/stop control.
    pub fn toggle_label(&self) -> &'static str {
        if self.is_active {
            "Stop Session"
        } else if self.phase.is_idle() && self.rounds_completed == self.total_rounds {
            "Start New Session"
        } else {
            "Start Session"
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Session lifecycle event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Started,
    Stopped,
    Completed,
}

/// Transient user-facing alert (toast) for a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// How long the front end should keep the alert on screen
    pub duration_ms: u32,
}

impl Notification {
    pub fn started(total_rounds: u32) -> Self {
        Self {
            kind: NotificationKind::Started,
            title: "Session Started".to_string(),
            message: format!("Beginning {total_rounds} rounds of guided breathing."),
            duration_ms: 3000,
        }
    }

    pub fn stopped() -> Self {
        Self {
            kind: NotificationKind::Stopped,
            title: "Session Stopped".to_string(),
            message: "Breathing exercise has been stopped.".to_string(),
            duration_ms: 3000,
        }
    }

    pub fn completed() -> Self {
        Self {
            kind: NotificationKind::Completed,
            title: "Session Complete!".to_string(),
            message: "You've completed all breathing rounds.".to_string(),
            duration_ms: 5000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio / Voice Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Preferred narrator voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoicePreference {
    #[default]
    Female,
    Male,
}

impl fmt::Display for VoicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoicePreference::Female => f.write_str("female"),
            VoicePreference::Male => f.write_str("male"),
        }
    }
}

impl std::str::FromStr for VoicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" => Ok(VoicePreference::Female),
            "male" => Ok(VoicePreference::Male),
            other => Err(format!("unknown voice preference '{other}' (expected female or male)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master enable for narration
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub voice: VoicePreference,

    /// BCP 47 tag the narrator voice should speak (e.g. "en-US")
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            voice: VoicePreference::default(),
            locale: default_locale(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Offline Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineSettings {
    /// Versioned cache store name; bump whenever the precache manifest changes
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Origin the precache manifest paths are resolved against
    #[serde(default = "default_origin")]
    pub origin: String,
}

pub const DEFAULT_CACHE_NAME: &str = "breatheeasy-cache-v1";

fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.to_string()
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for OfflineSettings {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            origin: default_origin(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted application configuration.
///
/// Persistence methods (load/save) live in breathe-core behind the
/// `AppConfigExt` trait so this crate stays free of platform dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub pattern: BreathingPattern,
    #[serde(default)]
    pub offline: OfflineSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_is_four_seven_eight() {
        let pattern = BreathingPattern::default();
        assert_eq!(pattern.duration(Phase::Inhale), 4);
        assert_eq!(pattern.duration(Phase::Hold), 7);
        assert_eq!(pattern.duration(Phase::Exhale), 8);
        assert_eq!(pattern.duration(Phase::Idle), 0);
        assert_eq!(pattern.round_secs(), 19);
        assert_eq!(pattern.total_rounds, 10);
        assert!(pattern.is_valid());
    }

    #[test]
    fn zero_duration_pattern_is_invalid() {
        let pattern = BreathingPattern {
            hold_secs: 0,
            ..Default::default()
        };
        assert!(!pattern.is_valid());
    }

    #[test]
    fn snapshot_labels() {
        let idle = SessionSnapshot {
            total_rounds: 10,
            ..Default::default()
        };
        assert_eq!(idle.label(), "Ready?");
        assert_eq!(idle.toggle_label(), "Start Session");
        assert!(!idle.show_progress());

        let running = SessionSnapshot {
            phase: Phase::Hold,
            countdown: 3,
            rounds_completed: 2,
            total_rounds: 10,
            is_active: true,
        };
        assert_eq!(running.label(), "hold");
        assert_eq!(running.toggle_label(), "Stop Session");
        assert_eq!(running.remaining_rounds(), 8);
        assert!(running.show_progress());

        let finished = SessionSnapshot {
            rounds_completed: 10,
            total_rounds: 10,
            ..Default::default()
        };
        assert_eq!(finished.toggle_label(), "Start New Session");
        assert_eq!(finished.remaining_rounds(), 0);
        assert!(finished.show_progress());
    }

    #[test]
    fn voice_preference_parses_case_insensitively() {
        assert_eq!("Female".parse::<VoicePreference>(), Ok(VoicePreference::Female));
        assert_eq!(" male ".parse::<VoicePreference>(), Ok(VoicePreference::Male));
        assert!("robot".parse::<VoicePreference>().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [audio]
            voice = "male"

            [pattern]
            hold_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.audio.voice, VoicePreference::Male);
        assert!(config.audio.enabled);
        assert_eq!(config.audio.locale, "en-US");
        assert_eq!(config.pattern.hold_secs, 5);
        assert_eq!(config.pattern.inhale_secs, 4);
        assert_eq!(config.offline.cache_name, DEFAULT_CACHE_NAME);
    }
}
