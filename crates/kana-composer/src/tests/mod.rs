mod basic;
mod modes;

use std::sync::Arc;

use kana_core::settings::{parse_settings_toml, Settings, DEFAULT_SETTINGS_TOML};
use kana_core::table::Table;

use crate::{Composer, KeyEvent};

pub(super) fn default_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap()
}

/// Default settings with `edit` applied.
pub(super) fn settings_with(edit: impl FnOnce(&mut Settings)) -> Arc<Settings> {
    let mut settings = default_settings();
    edit(&mut settings);
    Arc::new(settings)
}

pub(super) fn make_composer() -> Composer {
    Composer::new(Table::default_romaji(), Arc::new(default_settings()))
}

pub(super) fn make_twelve_key_composer() -> Composer {
    Composer::new(Table::twelve_key(), Arc::new(default_settings()))
}

// Helper: simulate typing a string one key event at a time
pub(super) fn type_string(composer: &mut Composer, s: &str) -> Vec<bool> {
    s.chars()
        .map(|ch| composer.insert_key_event(&KeyEvent::key(ch)))
        .collect()
}
