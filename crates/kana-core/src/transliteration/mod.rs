//! Script/width variants of composed text.
//!
//! `TransliterationType` names the user-facing variants (what the conversion
//! engine offers as F6..F10-style candidates and what input modes are made
//! of). `Transliterator` is the rendering function applied to one chunk.

mod transliterator;

pub use transliterator::Transliterator;

use std::ops::Index;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransliterationType {
    Hiragana,
    FullKatakana,
    HalfAscii,
    HalfAsciiUpper,
    HalfAsciiLower,
    HalfAsciiCapitalized,
    FullAscii,
    FullAsciiUpper,
    FullAsciiLower,
    FullAsciiCapitalized,
    HalfKatakana,
}

impl TransliterationType {
    pub const COUNT: usize = 11;

    pub const ALL: [TransliterationType; Self::COUNT] = [
        Self::Hiragana,
        Self::FullKatakana,
        Self::HalfAscii,
        Self::HalfAsciiUpper,
        Self::HalfAsciiLower,
        Self::HalfAsciiCapitalized,
        Self::FullAscii,
        Self::FullAsciiUpper,
        Self::FullAsciiLower,
        Self::FullAsciiCapitalized,
        Self::HalfKatakana,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_ascii(self) -> bool {
        !matches!(
            self,
            Self::Hiragana | Self::FullKatakana | Self::HalfKatakana
        )
    }

    /// Drop the letter-case refinement: `HalfAsciiUpper` → `HalfAscii`.
    pub fn without_case(self) -> Self {
        match self {
            Self::HalfAsciiUpper | Self::HalfAsciiLower | Self::HalfAsciiCapitalized => {
                Self::HalfAscii
            }
            Self::FullAsciiUpper | Self::FullAsciiLower | Self::FullAsciiCapitalized => {
                Self::FullAscii
            }
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hiragana => "hiragana",
            Self::FullKatakana => "full_katakana",
            Self::HalfAscii => "half_ascii",
            Self::HalfAsciiUpper => "half_ascii_upper",
            Self::HalfAsciiLower => "half_ascii_lower",
            Self::HalfAsciiCapitalized => "half_ascii_capitalized",
            Self::FullAscii => "full_ascii",
            Self::FullAsciiUpper => "full_ascii_upper",
            Self::FullAsciiLower => "full_ascii_lower",
            Self::FullAsciiCapitalized => "full_ascii_capitalized",
            Self::HalfKatakana => "half_katakana",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// One rendering per `TransliterationType`, indexable by type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliterations {
    values: [String; TransliterationType::COUNT],
}

impl Transliterations {
    pub fn set(&mut self, t: TransliterationType, value: String) {
        self.values[t.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransliterationType, &str)> {
        TransliterationType::ALL
            .into_iter()
            .map(|t| (t, self.values[t.index()].as_str()))
    }

    /// Build the full set from the three base renderings; the width and case
    /// variants are derived from them.
    pub fn from_base(hiragana: String, full_katakana: String, half_ascii: String) -> Self {
        let half_katakana = crate::unicode::full_width_to_half_width(&full_katakana);
        let upper = half_ascii.to_ascii_uppercase();
        let lower = half_ascii.to_ascii_lowercase();
        let capitalized = capitalize(&half_ascii);
        let widen = crate::unicode::half_width_ascii_to_full_width_ascii;

        let mut t = Transliterations::default();
        t.set(TransliterationType::Hiragana, hiragana);
        t.set(TransliterationType::FullKatakana, full_katakana);
        t.set(TransliterationType::FullAscii, widen(&half_ascii));
        t.set(TransliterationType::FullAsciiUpper, widen(&upper));
        t.set(TransliterationType::FullAsciiLower, widen(&lower));
        t.set(TransliterationType::FullAsciiCapitalized, widen(&capitalized));
        t.set(TransliterationType::HalfAscii, half_ascii);
        t.set(TransliterationType::HalfAsciiUpper, upper);
        t.set(TransliterationType::HalfAsciiLower, lower);
        t.set(TransliterationType::HalfAsciiCapitalized, capitalized);
        t.set(TransliterationType::HalfKatakana, half_katakana);
        t
    }
}

impl Index<TransliterationType> for Transliterations {
    type Output = str;

    fn index(&self, t: TransliterationType) -> &str {
        &self.values[t.index()]
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_ascii_uppercase().to_string();
            out.push_str(&chars.as_str().to_ascii_lowercase());
            out
        }
        None => String::new(),
    }
}
