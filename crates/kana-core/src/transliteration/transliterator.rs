use crate::unicode::{
    full_width_ascii_to_half_width_ascii, full_width_to_half_width,
    half_width_ascii_to_full_width_ascii, half_width_to_full_width, hiragana_to_katakana,
    katakana_to_hiragana,
};

use super::TransliterationType;

/// Rendering function applied to a single chunk.
///
/// Every variant is a pure function of the chunk's `raw` keystrokes and its
/// `converted` text (conversion followed by pending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transliterator {
    /// Converted text as-is.
    #[default]
    ConversionString,
    /// Raw keystrokes as-is.
    RawString,
    Hiragana,
    FullKatakana,
    HalfKatakana,
    FullAscii,
    HalfAscii,
    /// Resolve to the chunk's own transliterator. Only meaningful in queries
    /// over a composition; a chunk never stores `Local`.
    Local,
}

impl Transliterator {
    pub fn transliterate(self, raw: &str, converted: &str) -> String {
        match self {
            Self::ConversionString | Self::Local => converted.to_string(),
            Self::RawString => raw.to_string(),
            Self::Hiragana => katakana_to_hiragana(&half_width_to_full_width(converted)),
            Self::FullKatakana => hiragana_to_katakana(&half_width_to_full_width(converted)),
            Self::HalfKatakana => {
                full_width_to_half_width(&hiragana_to_katakana(&half_width_to_full_width(
                    converted,
                )))
            }
            Self::FullAscii => half_width_ascii_to_full_width_ascii(raw),
            Self::HalfAscii => full_width_ascii_to_half_width_ascii(raw),
        }
    }

    /// Character count of the rendering.
    pub fn length(self, raw: &str, converted: &str) -> usize {
        match self {
            Self::ConversionString | Self::Local => converted.chars().count(),
            Self::RawString | Self::FullAscii | Self::HalfAscii => raw.chars().count(),
            _ => self.transliterate(raw, converted).chars().count(),
        }
    }

    /// Whether the rendering reads the raw keystrokes rather than the conversion.
    pub fn uses_raw(self) -> bool {
        matches!(self, Self::RawString | Self::FullAscii | Self::HalfAscii)
    }

    /// Transliterator used for chunks typed while `mode` is the input mode.
    pub fn for_mode(mode: TransliterationType) -> Self {
        match mode.without_case() {
            TransliterationType::HalfAscii => Self::HalfAscii,
            TransliterationType::FullAscii => Self::FullAscii,
            TransliterationType::HalfKatakana => Self::HalfKatakana,
            TransliterationType::FullKatakana => Self::FullKatakana,
            TransliterationType::Hiragana => Self::Hiragana,
            _ => Self::ConversionString,
        }
    }

    /// Input mode implied by a chunk transliterator, or `default` when the
    /// transliterator does not correspond to a mode.
    pub fn mode_or(self, default: TransliterationType) -> TransliterationType {
        match self {
            Self::Hiragana => TransliterationType::Hiragana,
            Self::FullKatakana => TransliterationType::FullKatakana,
            Self::HalfKatakana => TransliterationType::HalfKatakana,
            Self::FullAscii => TransliterationType::FullAscii,
            Self::HalfAscii => TransliterationType::HalfAscii,
            _ => default,
        }
    }
}
