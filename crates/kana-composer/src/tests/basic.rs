use std::sync::Arc;

use kana_core::settings::{PunctuationMethod, Settings};
use kana_core::table::Table;

use super::*;
use crate::{ComposerData, TransliterationType};

// --- Romaji input ---

#[test]
fn test_romaji_kyouha() {
    let mut composer = make_composer();
    type_string(&mut composer, "kyouha");
    assert_eq!(composer.string_for_preedit(), "きょうは");
    assert_eq!(composer.raw_string(), "kyouha");
    assert_eq!(composer.cursor(), 4);
    assert_eq!(composer.len(), 4);
}

#[test]
fn test_romaji_sokuon() {
    let mut composer = make_composer();
    type_string(&mut composer, "kitte");
    assert_eq!(composer.string_for_preedit(), "きって");
}

#[test]
fn test_trailing_n_is_pending() {
    let mut composer = make_composer();
    type_string(&mut composer, "kan");
    assert_eq!(composer.string_for_preedit(), "かｎ");
    assert_eq!(composer.query_for_conversion(), "かん");
    type_string(&mut composer, "a");
    assert_eq!(composer.string_for_preedit(), "かな");
}

#[test]
fn test_n_before_consonant_settles() {
    let mut composer = make_composer();
    type_string(&mut composer, "kanji");
    assert_eq!(composer.string_for_preedit(), "かんじ");
    let mut composer = make_composer();
    type_string(&mut composer, "nn");
    assert_eq!(composer.string_for_preedit(), "ん");
}

#[test]
fn test_unknown_key_is_identity() {
    let mut composer = make_composer();
    type_string(&mut composer, "@ka");
    assert_eq!(composer.string_for_preedit(), "＠か");
    assert_eq!(composer.raw_string(), "@ka");
}

#[test]
fn test_digits_and_punctuation() {
    let mut composer = make_composer();
    type_string(&mut composer, "1.");
    assert_eq!(composer.string_for_preedit(), "１。");
    type_string(&mut composer, "5");
    assert_eq!(composer.string_for_preedit(), "１．５");
}

#[test]
fn test_uppercase_key_matches_lowercase_rule() {
    let mut composer = make_composer();
    composer.insert_character("K");
    composer.insert_character("a");
    assert_eq!(composer.string_for_preedit(), "か");
    assert_eq!(composer.raw_string(), "Ka");
    assert_eq!(
        composer.sub_transliteration(TransliterationType::HalfAscii, 0, 1),
        "Ka"
    );
}

#[test]
fn test_key_and_preedit() {
    let mut composer = make_composer();
    assert!(composer.insert_character_key_and_preedit("t", "か"));
    assert_eq!(composer.string_for_preedit(), "か");
    assert_eq!(composer.raw_string(), "t");
}

// --- Limits ---

#[test]
fn test_max_length_refuses_insert() {
    let mut composer = make_composer();
    composer.set_max_length(3);
    let accepted = type_string(&mut composer, "aiueo");
    assert_eq!(accepted, vec![true, true, true, false, false]);
    assert_eq!(composer.string_for_preedit(), "あいう");
    assert!(!composer.enable_insert());
}

#[test]
fn test_max_length_from_settings() {
    let settings = settings_with(|s| s.composer.max_length = 2);
    let composer = Composer::new(Table::default_romaji(), settings);
    assert_eq!(composer.max_length(), 2);
}

// --- Modes and lifecycle ---

#[test]
fn test_input_mode_selects_script() {
    let mut composer = make_composer();
    composer.set_input_mode(TransliterationType::FullKatakana);
    type_string(&mut composer, "ka");
    composer.set_input_mode(TransliterationType::HalfAscii);
    type_string(&mut composer, "ka");
    assert_eq!(composer.string_for_preedit(), "カka");
    assert_eq!(composer.raw_string(), "kaka");
}

#[test]
fn test_output_mode_rerenders_and_moves_cursor() {
    let mut composer = make_composer();
    type_string(&mut composer, "kyou");
    composer.move_cursor_to_beginning();
    composer.set_output_mode(TransliterationType::HalfAscii);
    assert_eq!(composer.string_for_preedit(), "kyou");
    assert_eq!(composer.cursor(), 4);
    assert_eq!(composer.output_mode(), TransliterationType::HalfAscii);
    composer.set_output_mode(TransliterationType::FullKatakana);
    assert_eq!(composer.string_for_preedit(), "キョウ");
    assert_eq!(composer.cursor(), 3);
}

#[test]
fn test_reset_clears_state() {
    let mut composer = make_composer();
    type_string(&mut composer, "ka");
    composer.set_source_text("元");
    composer.set_output_mode(TransliterationType::FullKatakana);
    composer.reset();
    assert!(composer.is_empty());
    assert_eq!(composer.cursor(), 0);
    assert_eq!(composer.source_text(), "");
    assert_eq!(composer.output_mode(), TransliterationType::Hiragana);
    assert_eq!(composer.timestamp_msec(), 0);
}

#[test]
fn test_edit_erase_keeps_table() {
    let mut composer = make_twelve_key_composer();
    type_string(&mut composer, "2");
    composer.edit_erase();
    assert!(composer.is_empty());
    type_string(&mut composer, "2");
    assert_eq!(composer.string_for_preedit(), "か");
}

#[test]
fn test_default_composer() {
    let mut composer = Composer::default();
    type_string(&mut composer, "a");
    assert_eq!(composer.string_for_preedit(), "あ");
}

#[test]
fn test_punctuation_from_settings() {
    let mut settings: Settings = default_settings();
    settings.table.punctuation_method = PunctuationMethod::CommaPeriod;
    let mut composer = Composer::from_settings(Arc::new(settings));
    type_string(&mut composer, "a,i.");
    assert_eq!(composer.string_for_preedit(), "あ，い．");
}

#[test]
fn test_set_table_applies_to_new_keys() {
    let mut composer = make_composer();
    type_string(&mut composer, "a");
    composer.set_table(Table::twelve_key());
    type_string(&mut composer, "2");
    assert_eq!(composer.string_for_preedit(), "あか");
}
