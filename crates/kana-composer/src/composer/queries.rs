use std::collections::BTreeSet;

use kana_core::transliteration::{TransliterationType, Transliterations, Transliterator};
use kana_core::unicode::full_width_ascii_to_half_width_ascii;

use super::data::{ComposerData, HandwritingComposition, Preedit};
use super::mode::InputFieldType;
use super::Composer;
use crate::composition::TrimMode;

impl Composer {
    fn number_transform(&self, query: &mut String) {
        if self.settings.composer.use_number_transform {
            Self::transform_characters_for_numbers(query);
        }
    }

    fn sub_text(&self, t: Transliterator, pos: usize, size: usize) -> String {
        self.composition.sub_string(t, pos, size)
    }
}

impl ComposerData for Composer {
    fn input_mode(&self) -> TransliterationType {
        self.mode.current()
    }

    fn output_mode(&self) -> TransliterationType {
        self.output_mode
    }

    fn input_field_type(&self) -> InputFieldType {
        self.input_field_type
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.composition.len()
    }

    fn preedit(&self) -> Preedit {
        let text: Vec<char> = self.string_for_preedit().chars().collect();
        let cursor = self.cursor.min(text.len());
        let focused_end = (cursor + 1).min(text.len());
        Preedit {
            left: text[..cursor].iter().collect(),
            focused: text[cursor..focused_end].iter().collect(),
            right: text[focused_end..].iter().collect(),
        }
    }

    /// The local rendering, number punctuation rewritten. Password, phone
    /// and number fields get half-width ASCII.
    fn string_for_preedit(&self) -> String {
        let mut text = self.composition.string();
        self.number_transform(&mut text);
        match self.input_field_type {
            InputFieldType::Password | InputFieldType::Tel | InputFieldType::Number => {
                full_width_ascii_to_half_width_ascii(&text)
            }
            InputFieldType::Normal => text,
        }
    }

    fn string_for_submission(&self) -> String {
        self.string_for_preedit()
    }

    fn query_for_conversion(&self) -> String {
        let mut query = self.composition.string_with_trim_mode(TrimMode::Fix);
        self.number_transform(&mut query);
        full_width_ascii_to_half_width_ascii(&query)
    }

    fn query_for_prediction(&self) -> String {
        match self.mode.current() {
            TransliterationType::HalfAscii => return self.composition.string(),
            TransliterationType::FullAscii => {
                return full_width_ascii_to_half_width_ascii(&self.composition.string())
            }
            _ => {}
        }
        let mut query = self.composition.string_with_trim_mode(TrimMode::Trim);
        self.number_transform(&mut query);
        full_width_ascii_to_half_width_ascii(&query)
    }

    fn queries_for_prediction(&self) -> (String, BTreeSet<String>) {
        if matches!(
            self.mode.current(),
            TransliterationType::HalfAscii | TransliterationType::FullAscii
        ) {
            return (self.query_for_prediction(), BTreeSet::new());
        }
        let (base, expanded) = self.composition.expanded_strings();
        (full_width_ascii_to_half_width_ascii(&base), expanded)
    }

    fn string_for_type_correction(&self) -> String {
        self.composition.raw_string()
    }

    fn raw_string(&self) -> String {
        self.composition.raw_string()
    }

    fn raw_sub_string(&self, pos: usize, size: usize) -> String {
        self.composition.raw_sub_string(pos, size)
    }

    fn transliterations(&self) -> Transliterations {
        self.sub_transliterations(0, self.composition.len())
    }

    fn sub_transliterations(&self, pos: usize, size: usize) -> Transliterations {
        Transliterations::from_base(
            self.sub_text(Transliterator::Hiragana, pos, size),
            self.sub_text(Transliterator::FullKatakana, pos, size),
            self.sub_text(Transliterator::HalfAscii, pos, size),
        )
    }

    fn sub_transliteration(&self, t: TransliterationType, pos: usize, size: usize) -> String {
        self.sub_transliterations(pos, size)[t].to_string()
    }

    fn should_commit(&self) -> bool {
        self.composition.should_commit()
    }

    /// Characters to commit from the head so the field keeps at most one
    /// (password) or zero (phone, number) composing characters.
    fn should_commit_head(&self) -> Option<usize> {
        let keep = match self.input_field_type {
            InputFieldType::Password => 1,
            InputFieldType::Tel | InputFieldType::Number => 0,
            InputFieldType::Normal => return None,
        };
        let len = self.composition.len();
        (len > keep).then(|| len - keep)
    }

    fn source_text(&self) -> &str {
        &self.source_text
    }

    fn handwriting_compositions(&self) -> &[HandwritingComposition] {
        &self.handwriting
    }
}
