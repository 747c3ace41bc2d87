//! Narrator voice metadata and selection
//!
//! Voice catalogs differ per platform, so selection is a pluggable strategy.
//! `PreferredVoiceSelector` is the default best-effort heuristic.

use breathe_types::VoicePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Female,
    Male,
}

impl From<VoicePreference> for VoiceGender {
    fn from(preference: VoicePreference) -> Self {
        match preference {
            VoicePreference::Female => VoiceGender::Female,
            VoicePreference::Male => VoiceGender::Male,
        }
    }
}

/// A voice offered by the host speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Engine-specific identifier passed back when speaking
    pub id: String,
    pub name: String,
    /// BCP 47 tag, e.g. "en-US"
    pub locale: String,
    /// Gender reported by the engine, when it reports one
    pub gender: Option<VoiceGender>,
    /// Engine's own default voice
    pub is_default: bool,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            locale: locale.into(),
            gender: None,
            is_default: false,
        }
    }

    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Whether this voice speaks the primary language of `locale`.
    pub fn speaks(&self, locale: &str) -> bool {
        let ours = primary_language(&self.locale);
        !ours.is_empty() && ours.eq_ignore_ascii_case(primary_language(locale))
    }

    /// Reported gender, or a guess from the voice id and name.
    pub fn gender_hint(&self) -> Option<VoiceGender> {
        self.gender
            .or_else(|| gender_from_label(&self.name))
            .or_else(|| gender_from_label(&self.id))
    }
}

fn primary_language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or("").trim()
}

const FEMALE_WORDS: &[&str] = &[
    "female", "woman", "samantha", "zira", "victoria", "karen", "susan", "fiona", "moira", "tessa",
];

const MALE_WORDS: &[&str] = &[
    "male", "man", "daniel", "david", "alex", "fred", "mark", "george", "thomas",
];

/// Guess gender from words in a voice label ("Microsoft Zira", "en-us+f3").
fn gender_from_label(label: &str) -> Option<VoiceGender> {
    let lower = label.to_ascii_lowercase();
    for word in lower.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        if FEMALE_WORDS.contains(&word) || is_variant(word, 'f') {
            return Some(VoiceGender::Female);
        }
        if MALE_WORDS.contains(&word) || is_variant(word, 'm') {
            return Some(VoiceGender::Male);
        }
    }
    None
}

/// espeak-style variant names: "f3", "m1".
fn is_variant(word: &str, prefix: char) -> bool {
    word.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Chooses which of the available voices narrates.
pub trait VoiceSelector: Send + Sync {
    /// Index into `voices` of the chosen voice, or `None` when there is
    /// nothing to choose from.
    fn select(&self, voices: &[Voice], locale: &str, preference: VoicePreference) -> Option<usize>;
}

/// Fallback chain: locale + preferred gender, then any voice for the
/// locale, then the engine default, then the first voice.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferredVoiceSelector;

impl VoiceSelector for PreferredVoiceSelector {
    fn select(&self, voices: &[Voice], locale: &str, preference: VoicePreference) -> Option<usize> {
        if voices.is_empty() {
            return None;
        }

        let wanted = VoiceGender::from(preference);

        voices
            .iter()
            .position(|v| v.speaks(locale) && v.gender_hint() == Some(wanted))
            .or_else(|| voices.iter().position(|v| v.speaks(locale)))
            .or_else(|| voices.iter().position(|v| v.is_default))
            .or(Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Voice> {
        vec![
            Voice::new("de-1", "Anna", "de-DE").as_default(),
            Voice::new("en-1", "Microsoft David", "en-US"),
            Voice::new("en-2", "Microsoft Zira", "en-US"),
            Voice::new("fr-1", "Amelie", "fr-CA").with_gender(VoiceGender::Female),
        ]
    }

    #[test]
    fn prefers_locale_and_gender() {
        let voices = catalog();
        let selector = PreferredVoiceSelector;
        assert_eq!(selector.select(&voices, "en-US", VoicePreference::Female), Some(2));
        assert_eq!(selector.select(&voices, "en-US", VoicePreference::Male), Some(1));
    }

    #[test]
    fn falls_back_to_any_voice_for_locale() {
        let voices = vec![
            Voice::new("x", "Robot", "en-GB"),
            Voice::new("y", "Default", "es-ES").as_default(),
        ];
        let selected = PreferredVoiceSelector.select(&voices, "en-US", VoicePreference::Male);
        assert_eq!(selected, Some(0));
    }

    #[test]
    fn falls_back_to_default_then_first() {
        let voices = vec![
            Voice::new("a", "Alpha", "it-IT"),
            Voice::new("b", "Beta", "pt-BR").as_default(),
        ];
        let selected = PreferredVoiceSelector.select(&voices, "ja-JP", VoicePreference::Female);
        assert_eq!(selected, Some(1));

        let voices = vec![Voice::new("a", "Alpha", "it-IT"), Voice::new("b", "Beta", "pt-BR")];
        let selected = PreferredVoiceSelector.select(&voices, "ja-JP", VoicePreference::Female);
        assert_eq!(selected, Some(0));
    }

    #[test]
    fn no_voices_selects_nothing() {
        assert_eq!(PreferredVoiceSelector.select(&[], "en-US", VoicePreference::Female), None);
    }

    #[test]
    fn locale_matching_uses_primary_language() {
        let voice = Voice::new("v", "Voice", "en_GB");
        assert!(voice.speaks("en-US"));
        assert!(voice.speaks("EN"));
        assert!(!voice.speaks("es-ES"));
        assert!(!Voice::new("v", "Voice", "").speaks(""));
    }

    #[test]
    fn gender_hint_from_labels() {
        assert_eq!(
            Voice::new("en-us+f3", "english-us", "en-US").gender_hint(),
            Some(VoiceGender::Female)
        );
        assert_eq!(
            Voice::new("en-us+m1", "english-us", "en-US").gender_hint(),
            Some(VoiceGender::Male)
        );
        assert_eq!(
            Voice::new("id", "Google UK English Female", "en-GB").gender_hint(),
            Some(VoiceGender::Female)
        );
        // "German" must not read as "man"
        assert_eq!(Voice::new("id", "German", "de-DE").gender_hint(), None);
        assert_eq!(
            Voice::new("id", "Zira", "en-US")
                .with_gender(VoiceGender::Male)
                .gender_hint(),
            Some(VoiceGender::Male)
        );
    }
}
