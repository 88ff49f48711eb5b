//! Global composer settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before the first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Composers can also be handed an explicit `Arc<Settings>`; the singleton is
//! only the default.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::transliteration::TransliterationType;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub composer: ComposerSettings,
    pub request: RequestSettings,
    pub table: TableSettings,
}

impl Default for Settings {
    fn default() -> Self {
        settings().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComposerSettings {
    pub shift_key_mode_switch: ShiftKeyModeSwitch,
    pub use_auto_mode_switch: bool,
    pub preferred_alphanumeric: TransliterationType,
    pub timeout_threshold_msec: u64,
    pub max_length: usize,
    pub toggle_cycle: Vec<TransliterationType>,
    pub use_number_transform: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestSettings {
    pub update_input_mode_from_surrounding_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct TableSettings {
    pub preedit_method: PreeditMethod,
    pub punctuation_method: PunctuationMethod,
}

/// What a run of shifted letters does to the input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKeyModeSwitch {
    Off,
    AsciiInputMode,
    KatakanaInputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreeditMethod {
    Roman,
    Kana,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationMethod {
    KutenTouten,
    CommaPeriod,
    KutenPeriod,
    CommaTouten,
}

impl PunctuationMethod {
    /// Outputs for the `,` and `.` keys.
    pub fn comma_and_period(self) -> (&'static str, &'static str) {
        match self {
            Self::KutenTouten => ("、", "。"),
            Self::CommaPeriod => ("，", "．"),
            Self::KutenPeriod => ("、", "．"),
            Self::CommaTouten => ("，", "。"),
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! invalid {
        ($field:literal, $reason:expr) => {
            return Err(SettingsError::InvalidValue {
                field: $field.to_string(),
                reason: $reason.to_string(),
            })
        };
    }

    let c = &s.composer;
    if c.max_length == 0 {
        invalid!("composer.max_length", "must be positive");
    }
    if !c.preferred_alphanumeric.is_ascii() {
        invalid!("composer.preferred_alphanumeric", "must be an ASCII mode");
    }
    if c.toggle_cycle.is_empty() {
        invalid!("composer.toggle_cycle", "must not be empty");
    }
    for (i, mode) in c.toggle_cycle.iter().enumerate() {
        if c.toggle_cycle[..i].contains(mode) {
            invalid!(
                "composer.toggle_cycle",
                format!("{} listed twice", mode.name())
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_composer(composer: &str) -> String {
        format!(
            "[composer]\n{composer}\n\n[request]\nupdate_input_mode_from_surrounding_text = true\n\n\
             [table]\npreedit_method = \"roman\"\npunctuation_method = \"kuten_touten\"\n"
        )
    }

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(
            s.composer.shift_key_mode_switch,
            ShiftKeyModeSwitch::AsciiInputMode
        );
        assert!(!s.composer.use_auto_mode_switch);
        assert_eq!(
            s.composer.preferred_alphanumeric,
            TransliterationType::HalfAscii
        );
        assert_eq!(s.composer.timeout_threshold_msec, 1000);
        assert_eq!(s.composer.max_length, 256);
        assert_eq!(
            s.composer.toggle_cycle,
            vec![TransliterationType::Hiragana, TransliterationType::HalfAscii]
        );
        assert!(s.composer.use_number_transform);
        assert!(s.request.update_input_mode_from_surrounding_text);
        assert_eq!(s.table.preedit_method, PreeditMethod::Roman);
        assert_eq!(s.table.punctuation_method, PunctuationMethod::KutenTouten);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = with_composer(
            r#"shift_key_mode_switch = "katakana_input_mode"
use_auto_mode_switch = true
preferred_alphanumeric = "full_ascii"
timeout_threshold_msec = 0
max_length = 32
toggle_cycle = ["hiragana", "full_katakana", "half_ascii"]
use_number_transform = false"#,
        );
        let s = parse_settings_toml(&toml).unwrap();
        assert_eq!(
            s.composer.shift_key_mode_switch,
            ShiftKeyModeSwitch::KatakanaInputMode
        );
        assert_eq!(s.composer.max_length, 32);
        assert_eq!(s.composer.toggle_cycle.len(), 3);
    }

    #[test]
    fn error_zero_max_length() {
        let toml = DEFAULT_SETTINGS_TOML.replace("max_length = 256", "max_length = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("composer.max_length"));
    }

    #[test]
    fn error_duplicate_toggle_mode() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            r#"toggle_cycle = ["hiragana", "half_ascii"]"#,
            r#"toggle_cycle = ["hiragana", "hiragana"]"#,
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("hiragana listed twice"));
    }

    #[test]
    fn error_kana_preferred_alphanumeric() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            r#"preferred_alphanumeric = "half_ascii""#,
            r#"preferred_alphanumeric = "hiragana""#,
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("preferred_alphanumeric"));
    }

    #[test]
    fn error_unknown_enum_value() {
        let toml = DEFAULT_SETTINGS_TOML.replace("\"kuten_touten\"", "\"dots\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("[composer]\nmax_length = 1\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn punctuation_pairs() {
        assert_eq!(PunctuationMethod::KutenTouten.comma_and_period(), ("、", "。"));
        assert_eq!(PunctuationMethod::CommaPeriod.comma_and_period(), ("，", "．"));
        assert_eq!(PunctuationMethod::KutenPeriod.comma_and_period(), ("、", "．"));
        assert_eq!(PunctuationMethod::CommaTouten.comma_and_period(), ("，", "。"));
    }
}
