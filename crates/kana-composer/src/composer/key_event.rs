use kana_core::table::SpecialKey;
use kana_core::transliteration::{TransliterationType, Transliterator};
use tracing::debug_span;

use super::Composer;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CAPS_LOCK = 1 << 1;
    }
}

/// How a key carrying preedit text is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStyle {
    /// Through the table and the current input mode.
    #[default]
    FollowMode,
    /// The preedit text verbatim.
    AsIs,
    /// Verbatim, for text that commits directly.
    DirectInput,
}

/// A character key event as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Character the key types.
    pub key_code: Option<char>,
    /// Text already resolved for the key (kana keyboards).
    pub key_string: Option<String>,
    pub modifiers: Modifiers,
    pub input_style: InputStyle,
    /// Input mode the host requests for this key.
    pub mode: Option<TransliterationType>,
    pub timestamp_msec: Option<u64>,
}

impl KeyEvent {
    pub fn key(c: char) -> Self {
        Self {
            key_code: Some(c),
            ..Self::default()
        }
    }

    pub fn key_with_string(c: char, key_string: impl Into<String>) -> Self {
        Self {
            key_code: Some(c),
            key_string: Some(key_string.into()),
            ..Self::default()
        }
    }

    pub fn string(key_string: impl Into<String>) -> Self {
        Self {
            key_string: Some(key_string.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, timestamp_msec: u64) -> Self {
        self.timestamp_msec = Some(timestamp_msec);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_mode(mut self, mode: TransliterationType) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_input_style(mut self, style: InputStyle) -> Self {
        self.input_style = style;
        self
    }
}

impl Composer {
    /// Insert a key event. Returns false when nothing was inserted.
    ///
    /// A gap longer than the timeout threshold since the previous timed key
    /// stops key toggling first, so a slow second press of a multi-tap key
    /// starts a new character.
    pub fn insert_key_event(&mut self, event: &KeyEvent) -> bool {
        let _span = debug_span!("insert_key_event", ?event).entered();

        if !self.enable_insert() {
            return false;
        }

        if self.timeout_threshold_msec > 0 {
            if let Some(now) = event.timestamp_msec {
                if self.timestamp_msec > 0
                    && now.saturating_sub(self.timestamp_msec) > self.timeout_threshold_msec
                {
                    self.insert_command_character(SpecialKey::StopKeyToggling);
                }
                self.timestamp_msec = now;
            }
        }

        if let Some(mode) = event.mode {
            // setting the current mode again would drop the comeback mode
            if mode != self.mode.current() {
                self.set_input_mode(mode);
            }
        }

        match (event.key_code, event.key_string.as_deref()) {
            (Some(code), Some(preedit)) => {
                let mut buf = [0u8; 4];
                let key = code.encode_utf8(&mut buf);
                if matches!(event.input_style, InputStyle::AsIs | InputStyle::DirectInput) {
                    self.composition
                        .set_input_transliterator(Transliterator::ConversionString);
                    self.insert_character_key_and_preedit(key, preedit);
                    self.set_input_mode(self.mode.comeback);
                } else {
                    self.insert_character_key_and_preedit(key, preedit);
                }
            }
            (Some(code), None) => {
                let mut buf = [0u8; 4];
                let key = code.encode_utf8(&mut buf);
                self.apply_temporary_input_mode(key, event.modifiers.contains(Modifiers::CAPS_LOCK));
                self.insert_character(key);
            }
            // preedit-only events bypass the shift-run detector
            (None, Some(text)) => self.insert_character_preedit(text),
            (None, None) => return false,
        }

        if self.mode.comeback == self.mode.current() {
            self.auto_switch_mode();
        }
        true
    }
}
