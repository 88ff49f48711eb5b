//! Stateful composer: a composition plus the cursor, input/output modes,
//! field constraints and the key-event bookkeeping around it.
//!
//! Read-only queries live on the [`ComposerData`] trait (see `queries.rs`);
//! this module holds the editing commands.

mod data;
mod key_event;
mod mode;
mod mode_switch;
mod queries;

pub use data::{ComposerData, HandwritingComposition, Preedit};
pub use key_event::{InputStyle, KeyEvent, Modifiers};
pub use mode::{InputFieldType, ModeEvent, ModeState};
pub use mode_switch::{mode_switching_rule, ModeSwitching};

use std::sync::Arc;

use kana_core::settings::Settings;
use kana_core::table::{SpecialKey, Table};
use kana_core::transliteration::{TransliterationType, Transliterator};
use tracing::{debug, warn};

use crate::chunk::CompositionInput;
use crate::composition::Composition;

#[derive(Debug, Clone)]
pub struct Composer {
    composition: Composition,
    settings: Arc<Settings>,
    cursor: usize,
    mode: ModeState,
    output_mode: TransliterationType,
    input_field_type: InputFieldType,
    /// The next inserted key starts a new input even if it continues a
    /// toggle cycle (set on mode changes and temporary-mode reverts).
    is_new_input: bool,
    max_length: usize,
    timeout_threshold_msec: u64,
    /// Timestamp of the last key event that carried one; 0 when none yet.
    timestamp_msec: u64,
    source_text: String,
    handwriting: Vec<HandwritingComposition>,
}

impl Composer {
    pub fn new(table: Arc<Table>, settings: Arc<Settings>) -> Self {
        let mut composer = Self {
            composition: Composition::new(table),
            max_length: settings.composer.max_length,
            timeout_threshold_msec: settings.composer.timeout_threshold_msec,
            settings,
            cursor: 0,
            mode: ModeState::new(TransliterationType::Hiragana),
            output_mode: TransliterationType::Hiragana,
            input_field_type: InputFieldType::Normal,
            is_new_input: true,
            timestamp_msec: 0,
            source_text: String::new(),
            handwriting: Vec::new(),
        };
        composer.sync_input_transliterator();
        composer
    }

    /// Composer with the built-in table the settings select.
    pub fn from_settings(settings: Arc<Settings>) -> Self {
        let table = Table::for_settings(&settings.table);
        Self::new(table, settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table(&self) -> &Arc<Table> {
        self.composition.table()
    }

    pub fn set_table(&mut self, table: Arc<Table>) {
        self.composition.set_table(table);
    }

    /// Replace the settings. Length and timeout limits are reloaded from them.
    pub fn set_settings(&mut self, settings: Arc<Settings>) {
        self.max_length = settings.composer.max_length;
        self.timeout_threshold_msec = settings.composer.timeout_threshold_msec;
        self.settings = settings;
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn reset(&mut self) {
        self.edit_erase();
        self.reset_input_mode();
        self.set_output_mode(TransliterationType::Hiragana);
        self.source_text.clear();
        self.timestamp_msec = 0;
        self.handwriting.clear();
    }

    /// Clear the composition and return to the comeback input mode.
    pub fn edit_erase(&mut self) {
        self.composition.erase();
        self.cursor = 0;
        self.set_input_mode(self.mode.comeback);
    }

    // --- input modes --------------------------------------------------------

    pub fn comeback_input_mode(&self) -> TransliterationType {
        self.mode.comeback
    }

    pub fn mode_state(&self) -> ModeState {
        self.mode
    }

    pub fn shifted_sequence_count(&self) -> usize {
        self.mode.shifted_sequence_count
    }

    pub fn set_input_mode(&mut self, mode: TransliterationType) {
        self.transition(ModeEvent::Set(mode));
        self.is_new_input = true;
    }

    /// Override the current input mode; the comeback mode is kept.
    pub fn set_temporary_input_mode(&mut self, mode: TransliterationType) {
        self.transition(ModeEvent::SetTemporary(mode));
    }

    pub fn reset_input_mode(&mut self) {
        self.set_input_mode(self.mode.comeback);
    }

    /// Step to the next mode of the configured toggle cycle. A mode outside
    /// the cycle moves to its first entry.
    pub fn toggle_input_mode(&mut self) {
        let cycle = &self.settings.composer.toggle_cycle;
        let Some(&first) = cycle.first() else {
            return;
        };
        let current = self.mode.current();
        let next = cycle
            .iter()
            .position(|&m| m == current)
            .map_or(first, |i| cycle[(i + 1) % cycle.len()]);
        self.set_input_mode(next);
    }

    /// Feed a typed key to the shift-run detector.
    pub fn apply_temporary_input_mode(&mut self, input: &str, caps_locked: bool) {
        let Some(key) = input.chars().next() else {
            return;
        };
        let was_temporary = self.mode.is_temporary();
        self.transition(ModeEvent::KeyTyped {
            key,
            caps_locked,
            switch: self.settings.composer.shift_key_mode_switch,
        });
        if was_temporary && !self.mode.is_temporary() {
            self.is_new_input = true;
        }
    }

    /// Follow the mode of the text around the cursor: at the end, or between
    /// two chunks of one transliterator, that transliterator's mode becomes
    /// temporary. Anywhere else the comeback mode returns.
    pub fn update_input_mode(&mut self) {
        if self.cursor != 0
            && self
                .settings
                .request
                .update_input_mode_from_surrounding_text
        {
            let current = self.composition.transliterator_at(self.cursor);
            if self.cursor == self.composition.len()
                || current == self.composition.transliterator_at(self.cursor + 1)
            {
                let mode = current.mode_or(self.mode.comeback);
                self.transition(ModeEvent::SetTemporary(mode));
                self.is_new_input = true;
                return;
            }
        }
        self.set_input_mode(self.mode.comeback);
    }

    fn transition(&mut self, event: ModeEvent) {
        let before = self.mode.current();
        self.mode = self.mode.transition(event);
        if self.mode.current() != before {
            debug!(from = before.name(), to = self.mode.current().name(), ?event, "input mode");
        }
        self.sync_input_transliterator();
    }

    fn sync_input_transliterator(&mut self) {
        self.composition
            .set_input_transliterator(Transliterator::for_mode(self.mode.current()));
    }

    /// Re-render the whole composition in `mode` and move the cursor to the end.
    pub fn set_output_mode(&mut self, mode: TransliterationType) {
        self.output_mode = mode;
        let len = self.composition.len();
        self.composition
            .set_transliterator(0, len, Transliterator::for_mode(mode));
        self.cursor = self.composition.len();
    }

    pub fn set_input_field_type(&mut self, field_type: InputFieldType) {
        self.input_field_type = field_type;
    }

    pub fn set_new_input(&mut self) {
        self.is_new_input = true;
    }

    pub fn is_new_input(&self) -> bool {
        self.is_new_input
    }

    /// The chunk before the cursor is mid-way through a toggle cycle.
    pub fn is_toggleable(&self) -> bool {
        self.composition.is_toggleable(self.cursor)
    }

    // --- cursor -------------------------------------------------------------

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.update_input_mode();
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.composition.len() {
            self.cursor += 1;
        }
        self.update_input_mode();
    }

    pub fn move_cursor_to_beginning(&mut self) {
        self.cursor = 0;
        self.set_input_mode(self.mode.comeback);
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.composition.len();
        self.set_input_mode(self.mode.comeback);
    }

    pub fn move_cursor_to(&mut self, pos: usize) {
        self.cursor = pos.min(self.composition.len());
        self.update_input_mode();
    }

    // --- deletion -----------------------------------------------------------

    /// Delete the character at `pos`, keeping the cursor on the same text.
    pub fn delete_at(&mut self, pos: usize) {
        let before = self.composition.len();
        self.composition.delete_at(pos);
        let after = self.composition.len();
        if self.cursor > pos {
            self.cursor = (self.cursor + after).saturating_sub(before);
        }
        self.cursor = self.cursor.min(after);
    }

    pub fn delete_range(&mut self, pos: usize, len: usize) {
        for _ in 0..len {
            if pos >= self.composition.len() {
                break;
            }
            self.delete_at(pos);
        }
    }

    pub fn delete(&mut self) {
        self.delete_at(self.cursor);
        self.update_input_mode();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = self.composition.delete_at(self.cursor - 1);
        self.update_input_mode();
    }

    // --- insertion ----------------------------------------------------------

    /// Whether another character fits under `max_length`.
    pub fn enable_insert(&self) -> bool {
        let len = self.composition.len();
        if len >= self.max_length {
            warn!(len, max_length = self.max_length, "composition full, input refused");
            return false;
        }
        true
    }

    pub fn insert_character(&mut self, key: &str) {
        if !self.enable_insert() {
            return;
        }
        let input = CompositionInput::from_raw(key, self.is_new_input);
        self.is_new_input = false;
        self.cursor = self.composition.insert_at(self.cursor, &input);
    }

    /// Insert already-resolved text one character at a time, each character
    /// serving as its own key.
    pub fn insert_character_preedit(&mut self, text: &str) {
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let c = c.encode_utf8(&mut buf);
            if !self.insert_character_key_and_preedit(c, c) {
                return;
            }
        }
    }

    pub fn insert_character_key_and_preedit(&mut self, key: &str, preedit: &str) -> bool {
        if !self.enable_insert() {
            return false;
        }
        let input = CompositionInput::from_raw_and_preedit(key, preedit, self.is_new_input);
        self.is_new_input = false;
        self.cursor = self.composition.insert_at(self.cursor, &input);
        true
    }

    pub fn insert_command_character(&mut self, command: SpecialKey) {
        let input = CompositionInput::from_command(command);
        self.cursor = self.composition.insert_at(self.cursor, &input);
    }

    // --- field and limits ---------------------------------------------------

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }

    pub fn timeout_threshold_msec(&self) -> u64 {
        self.timeout_threshold_msec
    }

    pub fn set_timeout_threshold_msec(&mut self, threshold: u64) {
        self.timeout_threshold_msec = threshold;
    }

    pub fn timestamp_msec(&self) -> u64 {
        self.timestamp_msec
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    // --- handwriting --------------------------------------------------------

    /// Replace the composition with handwriting candidates. The best
    /// candidate becomes the preedit.
    pub fn set_compositions_for_handwriting(&mut self, compositions: Vec<HandwritingComposition>) {
        self.reset();
        if let Some(top) = compositions.first() {
            let text = top.text.clone();
            self.insert_character_preedit(&text);
        }
        self.handwriting = compositions;
    }

    /// Number punctuation rewrite shared by the preedit and the queries.
    pub fn transform_characters_for_numbers(query: &mut String) -> bool {
        kana_core::numeric::transform_characters_for_numbers(query)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::from_settings(Arc::new(Settings::default()))
    }
}
