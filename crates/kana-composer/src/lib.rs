//! Kana composition: turns typed keys into a cursor-addressable composed
//! string with consistent transliterated views.
//!
//! `Composer` owns the editing state and the input-mode policy; `Composition`
//! is the chunk sequence underneath it, and `CharChunk` one resolved unit.

mod chunk;
mod composer;
mod composition;

#[cfg(test)]
mod tests;

pub use chunk::{CharChunk, CompositionInput};
pub use composer::{
    mode_switching_rule, Composer, ComposerData, HandwritingComposition, InputFieldType,
    InputStyle, KeyEvent, ModeEvent, ModeState, ModeSwitching, Modifiers, Preedit,
};
pub use composition::{Composition, TrimMode};

pub use kana_core::table::SpecialKey;
pub use kana_core::transliteration::{TransliterationType, Transliterations, Transliterator};
