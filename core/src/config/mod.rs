//! Application configuration
//!
//! Re-exports the shared config types from breathe-types and provides
//! persistence for `AppConfig` through confy (TOML).

mod error;

use std::path::{Path, PathBuf};

pub use breathe_types::{
    AppConfig, AudioSettings, BreathingPattern, OfflineSettings, VoicePreference,
};
pub use error::ConfigError;

/// confy application name; also the config directory name.
pub const APP_NAME: &str = "breatheeasy";

const CONFIG_NAME: &str = "config";

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load from the platform config directory, falling back to defaults
    /// when the file is missing, unreadable or invalid.
    fn load() -> Self;

    fn load_from(path: &Path) -> Result<Self, ConfigError>;

    fn save(&self) -> Result<(), ConfigError>;

    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;

    /// Where `load`/`save` read and write.
    fn path() -> Result<PathBuf, ConfigError>;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        let config: AppConfig = match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load configuration, using defaults");
                return Self::default();
            }
        };
        sanitized(config)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = confy::load_path(path)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::InvalidPattern)
        }
    }
}

/// Replace an unusable pattern with the default, keeping everything else.
fn sanitized(mut config: AppConfig) -> AppConfig {
    if config.validate().is_err() {
        tracing::warn!(pattern = ?config.pattern, "Invalid breathing pattern in config, using 4-7-8");
        config.pattern = BreathingPattern::default();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.audio.voice = VoicePreference::Male;
        config.offline.origin = "https://breathe.example".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pattern]\ninhale_secs = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::InvalidPattern)
        ));

        let mut config = AppConfig::default();
        config.pattern.total_rounds = 0;
        assert!(matches!(config.save_to(&path), Err(ConfigError::InvalidPattern)));
    }

    #[test]
    fn sanitized_restores_default_pattern_only() {
        let mut config = AppConfig::default();
        config.pattern.exhale_secs = 0;
        config.audio.enabled = false;

        let config = sanitized(config);
        assert_eq!(config.pattern, BreathingPattern::default());
        assert!(!config.audio.enabled);
    }
}
