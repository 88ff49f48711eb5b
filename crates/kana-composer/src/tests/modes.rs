use kana_core::settings::{PreeditMethod, ShiftKeyModeSwitch};
use kana_core::table::Table;

use super::*;
use crate::{ComposerData, Modifiers, TransliterationType};

use TransliterationType::{FullAscii, FullKatakana, HalfAscii, Hiragana};

fn composer_with(settings: Arc<kana_core::settings::Settings>) -> Composer {
    Composer::new(Table::default_romaji(), settings)
}

// --- Shift-key temporary modes ---

#[test]
fn test_single_shifted_letter_stays_ascii() {
    let mut composer = make_composer();
    type_string(&mut composer, "Kyou");
    assert_eq!(composer.string_for_preedit(), "Kyou");
    assert_eq!(composer.input_mode(), HalfAscii);
    assert_eq!(composer.comeback_input_mode(), Hiragana);
}

#[test]
fn test_shift_run_reverts_on_lowercase() {
    let mut composer = make_composer();
    type_string(&mut composer, "NY");
    assert_eq!(composer.input_mode(), HalfAscii);
    assert_eq!(composer.shifted_sequence_count(), 2);
    type_string(&mut composer, "a");
    assert_eq!(composer.input_mode(), Hiragana);
    assert_eq!(composer.string_for_preedit(), "NYあ");
    assert_eq!(composer.raw_string(), "NYa");
}

#[test]
fn test_caps_lock_inverts_shift() {
    let mut composer = make_composer();
    let event = KeyEvent::key('a').with_modifiers(Modifiers::CAPS_LOCK);
    composer.insert_key_event(&event);
    assert_eq!(composer.input_mode(), HalfAscii);
}

#[test]
fn test_katakana_shift_mode() {
    let settings =
        settings_with(|s| s.composer.shift_key_mode_switch = ShiftKeyModeSwitch::KatakanaInputMode);
    let mut composer = composer_with(settings);
    type_string(&mut composer, "KA");
    assert_eq!(composer.input_mode(), FullKatakana);
    type_string(&mut composer, "i");
    assert_eq!(composer.input_mode(), Hiragana);
    assert_eq!(composer.string_for_preedit(), "カい");
}

#[test]
fn test_shift_switch_off() {
    let settings = settings_with(|s| s.composer.shift_key_mode_switch = ShiftKeyModeSwitch::Off);
    let mut composer = composer_with(settings);
    type_string(&mut composer, "Ka");
    assert_eq!(composer.input_mode(), Hiragana);
    assert_eq!(composer.string_for_preedit(), "か");
}

#[test]
fn test_non_ascii_key_reverts_temporary_mode() {
    let mut composer = make_composer();
    type_string(&mut composer, "K");
    assert_eq!(composer.input_mode(), HalfAscii);
    composer.insert_key_event(&KeyEvent::key_with_string('a', "あ"));
    assert_eq!(composer.input_mode(), HalfAscii);
    composer.insert_key_event(&KeyEvent::key('あ'));
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_preedit_only_event_skips_shift_detection() {
    let mut composer = make_composer();
    composer.insert_key_event(&KeyEvent::string("A"));
    assert_eq!(composer.input_mode(), Hiragana);
    assert_eq!(composer.shifted_sequence_count(), 0);

    let mut composer = make_composer();
    composer.insert_key_event(&KeyEvent::key('A'));
    assert_eq!(composer.input_mode(), HalfAscii);
    assert_eq!(composer.shifted_sequence_count(), 1);
}

// --- Explicit mode commands ---

#[test]
fn test_toggle_input_mode_cycles() {
    let mut composer = make_composer();
    composer.toggle_input_mode();
    assert_eq!(composer.input_mode(), HalfAscii);
    composer.toggle_input_mode();
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_toggle_returns_after_full_cycle() {
    let cycle = vec![Hiragana, FullKatakana, HalfAscii, FullAscii];
    let settings = settings_with(|s| s.composer.toggle_cycle = cycle.clone());
    let mut composer = composer_with(settings);
    for expected in cycle.iter().cycle().skip(1).take(cycle.len()) {
        composer.toggle_input_mode();
        assert_eq!(composer.input_mode(), *expected);
    }
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_toggle_from_mode_outside_cycle() {
    let mut composer = make_composer();
    composer.set_input_mode(FullKatakana);
    composer.toggle_input_mode();
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_temporary_mode_keeps_comeback() {
    let mut composer = make_composer();
    composer.set_temporary_input_mode(FullKatakana);
    assert_eq!(composer.input_mode(), FullKatakana);
    assert_eq!(composer.comeback_input_mode(), Hiragana);
    composer.reset_input_mode();
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_key_event_mode() {
    let mut composer = make_composer();
    composer.insert_key_event(&KeyEvent::key('a').with_mode(FullKatakana));
    assert_eq!(composer.string_for_preedit(), "ア");
    assert_eq!(composer.comeback_input_mode(), FullKatakana);
}

#[test]
fn test_key_event_same_mode_keeps_comeback() {
    let mut composer = make_composer();
    composer.set_temporary_input_mode(HalfAscii);
    composer.insert_key_event(&KeyEvent::key('a').with_mode(HalfAscii));
    assert_eq!(composer.comeback_input_mode(), Hiragana);
    assert_eq!(composer.string_for_preedit(), "a");
}

// --- Mode from surrounding text ---

fn mixed_composer(settings: Arc<kana_core::settings::Settings>) -> Composer {
    // か + ka, typed in hiragana then half-width ASCII
    let mut composer = composer_with(settings);
    type_string(&mut composer, "ka");
    composer.set_input_mode(HalfAscii);
    type_string(&mut composer, "ka");
    composer.set_input_mode(Hiragana);
    assert_eq!(composer.string_for_preedit(), "かka");
    composer
}

#[test]
fn test_cursor_follows_surrounding_mode() {
    let mut composer = mixed_composer(Arc::new(default_settings()));
    composer.move_cursor_left();
    assert_eq!(composer.cursor(), 2);
    assert_eq!(composer.input_mode(), HalfAscii);
    assert_eq!(composer.comeback_input_mode(), Hiragana);

    // between chunks of different modes the comeback mode returns
    composer.move_cursor_to(1);
    assert_eq!(composer.input_mode(), Hiragana);

    composer.move_cursor_to(3);
    assert_eq!(composer.input_mode(), HalfAscii);
    composer.move_cursor_to_end();
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_surrounding_mode_disabled() {
    let settings = settings_with(|s| s.request.update_input_mode_from_surrounding_text = false);
    let mut composer = mixed_composer(settings);
    composer.move_cursor_left();
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_typing_in_followed_mode() {
    let mut composer = mixed_composer(Arc::new(default_settings()));
    composer.move_cursor_left();
    type_string(&mut composer, "x");
    assert_eq!(composer.string_for_preedit(), "かkxa");
}

// --- Automatic mode switching ---

#[test]
fn test_auto_switch_on_product_name() {
    let settings = settings_with(|s| s.composer.use_auto_mode_switch = true);
    let mut composer = composer_with(settings);
    type_string(&mut composer, "google");
    assert_eq!(composer.output_mode(), HalfAscii);
    assert_eq!(composer.string_for_preedit(), "google");
    assert_eq!(composer.input_mode(), Hiragana);
}

#[test]
fn test_auto_switch_prefers_full_width() {
    let settings = settings_with(|s| {
        s.composer.use_auto_mode_switch = true;
        s.composer.preferred_alphanumeric = FullAscii;
    });
    let mut composer = composer_with(settings);
    type_string(&mut composer, "chrome");
    assert_eq!(composer.output_mode(), FullAscii);
    assert_eq!(composer.string_for_preedit(), "ｃｈｒｏｍｅ");
}

#[test]
fn test_auto_switch_on_url_prefix() {
    let settings = settings_with(|s| s.composer.use_auto_mode_switch = true);
    let mut composer = composer_with(settings);
    type_string(&mut composer, "http:");
    assert_eq!(composer.output_mode(), HalfAscii);
    assert_eq!(composer.input_mode(), HalfAscii);
    assert_eq!(composer.comeback_input_mode(), Hiragana);
    type_string(&mut composer, "//a");
    assert_eq!(composer.string_for_preedit(), "http://a");
}

#[test]
fn test_auto_switch_disabled_by_default() {
    let mut composer = make_composer();
    type_string(&mut composer, "google");
    assert_eq!(composer.output_mode(), Hiragana);
}

#[test]
fn test_auto_switch_needs_romaji_input() {
    let settings = settings_with(|s| {
        s.composer.use_auto_mode_switch = true;
        s.table.preedit_method = PreeditMethod::Kana;
    });
    let mut composer = composer_with(settings);
    type_string(&mut composer, "google");
    assert_eq!(composer.output_mode(), Hiragana);
}
