use std::collections::BTreeSet;

use kana_core::transliteration::{TransliterationType, Transliterations};

use super::mode::InputFieldType;

/// Preedit split around the cursor. `focused` is the character at the
/// cursor, empty when the cursor is at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preedit {
    pub left: String,
    pub focused: String,
    pub right: String,
}

impl Preedit {
    pub fn text(&self) -> String {
        format!("{}{}{}", self.left, self.focused, self.right)
    }
}

/// One handwriting recognition candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct HandwritingComposition {
    pub text: String,
    pub probability: f32,
}

/// Read-only view of a composer, for consumers that only render or query.
pub trait ComposerData {
    fn input_mode(&self) -> TransliterationType;
    fn output_mode(&self) -> TransliterationType;
    fn input_field_type(&self) -> InputFieldType;
    fn cursor(&self) -> usize;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn preedit(&self) -> Preedit;
    fn string_for_preedit(&self) -> String;
    fn string_for_submission(&self) -> String;
    fn query_for_conversion(&self) -> String;
    fn query_for_prediction(&self) -> String;
    /// Prediction base plus the completions of the trailing pending fragment.
    fn queries_for_prediction(&self) -> (String, BTreeSet<String>);
    fn string_for_type_correction(&self) -> String;
    fn raw_string(&self) -> String;
    fn raw_sub_string(&self, pos: usize, size: usize) -> String;
    fn transliterations(&self) -> Transliterations;
    fn sub_transliterations(&self, pos: usize, size: usize) -> Transliterations;
    fn sub_transliteration(&self, t: TransliterationType, pos: usize, size: usize) -> String;
    fn should_commit(&self) -> bool;
    fn should_commit_head(&self) -> Option<usize>;
    fn source_text(&self) -> &str;
    fn handwriting_compositions(&self) -> &[HandwritingComposition];
}
