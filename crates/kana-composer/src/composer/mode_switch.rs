//! Automatic mode switching for text that is obviously not Japanese: product
//! names typed in romaji and URL or path prefixes.

use kana_core::settings::PreeditMethod;
use kana_core::transliteration::{TransliterationType, Transliterator};
use tracing::debug;

use super::Composer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitching {
    NoChange,
    RevertToPreviousMode,
    PreferredAlphanumeric,
    HalfAlphanumeric,
    FullAlphanumeric,
}

const WORDS: [&str; 6] = ["google", "Google", "chrome", "Chrome", "android", "Android"];
const PREFIXES: [&str; 7] = ["http:", "https:", "www.", "mailto:", "ftp:", "file:", r"\\"];

/// Display and input switching for a half-width ASCII key, if any rule
/// matches the whole key.
pub fn mode_switching_rule(key: &str) -> Option<(ModeSwitching, ModeSwitching)> {
    if WORDS.contains(&key) {
        return Some((
            ModeSwitching::PreferredAlphanumeric,
            ModeSwitching::RevertToPreviousMode,
        ));
    }
    if PREFIXES.contains(&key) || is_drive_letter(key) {
        return Some((ModeSwitching::HalfAlphanumeric, ModeSwitching::HalfAlphanumeric));
    }
    None
}

/// `c:\` and the like.
fn is_drive_letter(key: &str) -> bool {
    matches!(key.as_bytes(), [letter, b':', b'\\'] if letter.is_ascii_alphabetic())
}

impl Composer {
    /// Switch modes when the composition matches a switching rule. Only
    /// active for romaji input with auto switching enabled.
    pub fn auto_switch_mode(&mut self) {
        if !self.settings.composer.use_auto_mode_switch
            || self.settings.table.preedit_method != PreeditMethod::Roman
        {
            return;
        }
        let key = self.composition.string_with(Transliterator::HalfAscii);
        let Some((display_switch, input_switch)) = mode_switching_rule(&key) else {
            return;
        };
        debug!(key = %key, ?display_switch, ?input_switch, "auto mode switch");

        let full = TransliterationType::FullAscii;
        let half = TransliterationType::HalfAscii;
        match display_switch {
            ModeSwitching::NoChange | ModeSwitching::RevertToPreviousMode => {}
            ModeSwitching::PreferredAlphanumeric => {
                let mode = if self.mode.current() == full
                    || self.settings.composer.preferred_alphanumeric == full
                {
                    full
                } else {
                    half
                };
                self.set_output_mode(mode);
            }
            ModeSwitching::HalfAlphanumeric => self.set_output_mode(half),
            ModeSwitching::FullAlphanumeric => self.set_output_mode(full),
        }

        match input_switch {
            ModeSwitching::NoChange => {}
            ModeSwitching::RevertToPreviousMode => self.set_input_mode(self.mode.comeback),
            ModeSwitching::PreferredAlphanumeric => {
                let mode = if self.mode.current() == full { full } else { half };
                self.set_temporary_input_mode(mode);
            }
            ModeSwitching::HalfAlphanumeric => {
                if self.mode.current() != half {
                    self.set_temporary_input_mode(half);
                }
            }
            ModeSwitching::FullAlphanumeric => {
                if self.mode.current() != full {
                    self.set_temporary_input_mode(full);
                }
            }
        }
    }
}
