//! Core building blocks of the kana composer: the conversion rule table,
//! transliteration of composed text, settings, and character helpers.

pub mod numeric;
pub mod settings;
pub mod table;
pub mod trace_init;
pub mod transliteration;
pub mod unicode;
