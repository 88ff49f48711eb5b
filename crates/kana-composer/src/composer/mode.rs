use kana_core::settings::ShiftKeyModeSwitch;
use kana_core::transliteration::TransliterationType;

/// Kind of text field the composition is typed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFieldType {
    #[default]
    Normal,
    Password,
    Tel,
    Number,
}

/// Input-mode stack: the mode to come back to, an optional temporary mode on
/// top of it, and the length of the current run of shifted letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    pub comeback: TransliterationType,
    pub temporary: Option<TransliterationType>,
    pub shifted_sequence_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    /// Set both the current and the comeback mode.
    Set(TransliterationType),
    /// Override the current mode until the next revert.
    SetTemporary(TransliterationType),
    Revert,
    /// A character key was typed.
    KeyTyped {
        key: char,
        caps_locked: bool,
        switch: ShiftKeyModeSwitch,
    },
}

impl ModeState {
    pub fn new(mode: TransliterationType) -> Self {
        Self {
            comeback: mode,
            temporary: None,
            shifted_sequence_count: 0,
        }
    }

    pub fn current(&self) -> TransliterationType {
        self.temporary.unwrap_or(self.comeback)
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary.is_some()
    }

    pub fn transition(self, event: ModeEvent) -> Self {
        match event {
            ModeEvent::Set(mode) => Self::new(mode),
            ModeEvent::SetTemporary(mode) => Self {
                comeback: self.comeback,
                temporary: (mode != self.comeback).then_some(mode),
                shifted_sequence_count: 0,
            },
            ModeEvent::Revert => Self::new(self.comeback),
            ModeEvent::KeyTyped {
                key,
                caps_locked,
                switch,
            } => self.key_typed(key, caps_locked, switch),
        }
    }

    fn key_typed(self, key: char, caps_locked: bool, switch: ShiftKeyModeSwitch) -> Self {
        if !key.is_ascii() {
            // kana keyboards and other non-ASCII input end a temporary mode
            return if self.is_temporary() {
                self.transition(ModeEvent::Revert)
            } else {
                self
            };
        }
        if switch == ShiftKeyModeSwitch::Off || !key.is_ascii_alphabetic() {
            return Self {
                shifted_sequence_count: 0,
                ..self
            };
        }

        // Caps Lock inverts what an uppercase letter means.
        let shifted = key.is_ascii_uppercase() != caps_locked;
        if shifted {
            let next = match switch {
                ShiftKeyModeSwitch::AsciiInputMode if !self.current().is_ascii() => {
                    self.transition(ModeEvent::SetTemporary(TransliterationType::HalfAscii))
                }
                ShiftKeyModeSwitch::KatakanaInputMode
                    if self.current() == TransliterationType::Hiragana =>
                {
                    self.transition(ModeEvent::SetTemporary(TransliterationType::FullKatakana))
                }
                _ => self,
            };
            return Self {
                shifted_sequence_count: next.shifted_sequence_count + 1,
                ..next
            };
        }

        let revert = self.is_temporary()
            && match switch {
                ShiftKeyModeSwitch::AsciiInputMode => self.shifted_sequence_count > 1,
                ShiftKeyModeSwitch::KatakanaInputMode => true,
                ShiftKeyModeSwitch::Off => false,
            };
        let next = if revert {
            self.transition(ModeEvent::Revert)
        } else {
            self
        };
        Self {
            shifted_sequence_count: 0,
            ..next
        }
    }
}
