//! Conversion rule table.
//!
//! A rule maps an input key (the pending fragment of a chunk followed by the
//! next typed character) to output text, a new pending fragment, and
//! attributes. Rules live in a vector; a character trie over the keys answers
//! whether a key is a complete rule, a prefix of longer rules, or both.

mod config;
mod special_key;
mod trie;

pub use config::{parse_table_toml, TableError};
pub use special_key::{is_special_key, parse_special_keys, strip_special_keys, SpecialKey};

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::settings::{PreeditMethod, PunctuationMethod, TableSettings};
use trie::{RuleTrie, Walk};

pub const DEFAULT_ROMAJI_TOML: &str = include_str!("default_romaji.toml");
pub const TWELVE_KEY_TOML: &str = include_str!("twelve_key.toml");

bitflags::bitflags! {
    /// Per-rule flags copied onto the chunk a rule resolves into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u8 {
        /// A fresh input of this key starts a new chunk even when the
        /// previous chunk could take it.
        const NEW_CHUNK = 1 << 0;
        /// The chunk is part of a multi-tap toggle cycle.
        const TOGGLE = 1 << 1;
        /// The output is final text; a composition of only such chunks can
        /// be committed directly.
        const DIRECT_INPUT = 1 << 2;
        /// ASCII renderings show the conversion instead of the raw keys.
        const NO_TRANSLITERATION = 1 << 3;
        /// The chunk takes no further input.
        const END_CHUNK = 1 << 4;
    }
}

const ATTRIBUTE_NAMES: [(&str, Attributes); 5] = [
    ("new_chunk", Attributes::NEW_CHUNK),
    ("toggle", Attributes::TOGGLE),
    ("direct_input", Attributes::DIRECT_INPUT),
    ("no_transliteration", Attributes::NO_TRANSLITERATION),
    ("end_chunk", Attributes::END_CHUNK),
];

impl Attributes {
    pub fn from_config_name(name: &str) -> Option<Self> {
        ATTRIBUTE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, a)| a)
    }

    pub fn names(self) -> Vec<&'static str> {
        ATTRIBUTE_NAMES
            .iter()
            .filter(|(_, a)| self.contains(*a))
            .map(|&(n, _)| n)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub input: String,
    pub output: String,
    pub pending: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMatch<'a> {
    /// Neither a rule nor a prefix of one.
    None,
    /// Only a prefix of longer rules.
    Prefix,
    /// A complete rule that nothing longer extends.
    Exact(&'a Rule),
    /// A complete rule that longer rules also extend (`n` before `na`).
    ExactAndPrefix(&'a Rule),
}

#[derive(Debug, Clone)]
pub struct Table {
    rules: Vec<Rule>,
    trie: RuleTrie,
    case_sensitive: bool,
}

impl Table {
    /// Build a table from rules. A table whose keys contain no upper-case
    /// letter matches input case-insensitively.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, TableError> {
        if rules.is_empty() {
            return Err(TableError::Empty);
        }
        let case_sensitive = rules
            .iter()
            .any(|r| r.input.chars().any(char::is_uppercase));
        let mut trie = RuleTrie::default();
        for (i, rule) in rules.iter().enumerate() {
            if rule.input.is_empty() {
                return Err(TableError::EmptyKey("rules"));
            }
            if trie.insert(rule.input.chars(), i).is_some() {
                return Err(TableError::DuplicateKey(rule.input.clone()));
            }
        }
        debug!(rules = rules.len(), case_sensitive, "table built");
        Ok(Table {
            rules,
            trie,
            case_sensitive,
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, TableError> {
        Self::from_rules(parse_table_toml(toml_str)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The built-in romaji → hiragana table.
    pub fn default_romaji() -> Arc<Table> {
        static INSTANCE: OnceLock<Arc<Table>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Arc::new(Table::from_toml(DEFAULT_ROMAJI_TOML).expect("romaji table must be valid"))
            })
            .clone()
    }

    /// The built-in 12-key multi-tap table.
    pub fn twelve_key() -> Arc<Table> {
        static INSTANCE: OnceLock<Arc<Table>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Arc::new(Table::from_toml(TWELVE_KEY_TOML).expect("12-key table must be valid"))
            })
            .clone()
    }

    /// Built-in table for a preedit method with the configured punctuation.
    /// Tables are built once per distinct setting and shared afterwards.
    pub fn for_settings(settings: &TableSettings) -> Arc<Table> {
        static CACHE: OnceLock<Mutex<HashMap<TableSettings, Arc<Table>>>> = OnceLock::new();
        let base = match settings.preedit_method {
            PreeditMethod::Roman => Table::default_romaji(),
            PreeditMethod::Kana => Table::twelve_key(),
        };
        if settings.punctuation_method == PunctuationMethod::KutenTouten {
            return base;
        }
        let mut cache = CACHE
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(*settings)
            .or_insert_with(|| Arc::new((*base).clone().with_punctuation(settings.punctuation_method)))
            .clone()
    }

    /// Rewrite the outputs of the `,` and `.` rules.
    pub fn with_punctuation(mut self, method: PunctuationMethod) -> Self {
        let (comma, period) = method.comma_and_period();
        for rule in &mut self.rules {
            if rule.output.is_empty() {
                continue;
            }
            match rule.input.as_str() {
                "," => rule.output = comma.to_string(),
                "." => rule.output = period.to_string(),
                _ => {}
            }
        }
        self
    }

    pub fn lookup(&self, key: &str) -> TableMatch<'_> {
        self.resolve(self.trie.walk(key.chars().map(|c| self.fold(c))))
    }

    /// Look up `pending` followed by `next` without building the key.
    pub fn lookup_next(&self, pending: &str, next: char) -> TableMatch<'_> {
        let key = pending
            .chars()
            .chain(std::iter::once(next))
            .map(|c| self.fold(c));
        self.resolve(self.trie.walk(key))
    }

    /// Every rule whose input starts with `prefix`, in table order.
    pub fn lookup_predictive(&self, prefix: &str) -> Vec<&Rule> {
        self.trie
            .descendants(prefix.chars().map(|c| self.fold(c)))
            .into_iter()
            .map(|i| &self.rules[i])
            .collect()
    }

    /// Whether `c` typed on its own matches a rule that opens a new chunk.
    pub fn has_new_chunk_entry(&self, c: char) -> bool {
        let walk = self.trie.walk(std::iter::once(self.fold(c)));
        walk
            .value
            .is_some_and(|i| self.rules[i].attributes.contains(Attributes::NEW_CHUNK))
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn fold(&self, c: char) -> char {
        if self.case_sensitive {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }

    fn resolve(&self, walk: Walk) -> TableMatch<'_> {
        match (walk.value, walk.has_children) {
            (None, false) => TableMatch::None,
            (None, true) => TableMatch::Prefix,
            (Some(i), false) => TableMatch::Exact(&self.rules[i]),
            (Some(i), true) => TableMatch::ExactAndPrefix(&self.rules[i]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn output_of(m: TableMatch<'_>) -> Option<(&str, &str)> {
        match m {
            TableMatch::Exact(r) | TableMatch::ExactAndPrefix(r) => {
                Some((r.output.as_str(), r.pending.as_str()))
            }
            _ => None,
        }
    }

    #[test]
    fn test_vowel_exact() {
        let table = Table::default_romaji();
        assert!(matches!(table.lookup("a"), TableMatch::Exact(r) if r.output == "あ"));
    }

    #[test]
    fn test_consonant_prefix() {
        let table = Table::default_romaji();
        assert_eq!(table.lookup("k"), TableMatch::Prefix);
        assert_eq!(table.lookup("ky"), TableMatch::Prefix);
        assert_eq!(output_of(table.lookup("kya")), Some(("きゃ", "")));
    }

    #[test]
    fn test_n_is_exact_and_prefix() {
        let table = Table::default_romaji();
        assert!(matches!(table.lookup("n"), TableMatch::ExactAndPrefix(r) if r.output == "ん"));
        assert_eq!(output_of(table.lookup("nn")), Some(("ん", "")));
    }

    #[test]
    fn test_sokuon_keeps_pending() {
        let table = Table::default_romaji();
        assert_eq!(output_of(table.lookup("kk")), Some(("っ", "k")));
        assert_eq!(output_of(table.lookup("tc")), Some(("っ", "c")));
    }

    #[test]
    fn test_no_match() {
        let table = Table::default_romaji();
        assert_eq!(table.lookup("q1"), TableMatch::None);
        assert_eq!(table.lookup_next("k", '1'), TableMatch::None);
    }

    #[test]
    fn test_lookup_next_matches_lookup() {
        let table = Table::default_romaji();
        for key in ["ka", "sh", "shi", "n'", "xtsu", "z."] {
            let (pending, last) = key.split_at(key.len() - 1);
            let last = last.chars().next().unwrap();
            assert_eq!(table.lookup_next(pending, last), table.lookup(key), "{key}");
        }
    }

    #[test]
    fn test_case_insensitive_default() {
        let table = Table::default_romaji();
        assert!(!table.is_case_sensitive());
        assert_eq!(output_of(table.lookup("KA")), Some(("か", "")));
        assert_eq!(output_of(table.lookup_next("K", 'a')), Some(("か", "")));
    }

    #[test]
    fn test_case_sensitive_when_upper_keys_exist() {
        let table = Table::from_toml("[mappings]\na = \"あ\"\nA = \"ア\"\n").unwrap();
        assert!(table.is_case_sensitive());
        assert_eq!(output_of(table.lookup("A")), Some(("ア", "")));
        assert_eq!(output_of(table.lookup("a")), Some(("あ", "")));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let toml = "[mappings]\n\"あ1\" = \"x\"\n\n[toggles]\n\"1\" = [\"あ\", \"い\"]\n";
        let err = Table::from_toml(toml).unwrap_err();
        assert!(matches!(err, TableError::DuplicateKey(ref k) if k == "あ1"));
    }

    #[test]
    fn test_empty_rules_rejected() {
        assert!(matches!(Table::from_rules(Vec::new()), Err(TableError::Empty)));
    }

    #[test]
    fn test_predictive() {
        let table = Table::default_romaji();
        let outputs: Vec<&str> = table
            .lookup_predictive("ky")
            .iter()
            .map(|r| r.output.as_str())
            .collect();
        for expected in ["きゃ", "きぃ", "きゅ", "きぇ", "きょ"] {
            assert!(outputs.contains(&expected), "missing {expected}");
        }
        assert!(table.lookup_predictive("@").is_empty());
    }

    #[test]
    fn test_twelve_key_toggle_chain() {
        let table = Table::twelve_key();
        assert!(table.has_new_chunk_entry('2'));
        assert!(!table.has_new_chunk_entry('*'));
        assert_eq!(output_of(table.lookup("2")), Some(("", "か")));
        assert_eq!(output_of(table.lookup("か2")), Some(("", "き")));
        assert_eq!(output_of(table.lookup("こ2")), Some(("", "か")));
        assert_eq!(output_of(table.lookup("か*")), Some(("", "が")));
        let rewind = SpecialKey::Rewind.as_char();
        assert_eq!(output_of(table.lookup_next("き", rewind)), Some(("", "か")));
    }

    #[test]
    fn test_default_has_no_new_chunk_keys() {
        let table = Table::default_romaji();
        assert!(!table.has_new_chunk_entry('k'));
    }

    #[test]
    fn test_punctuation_settings() {
        let settings = TableSettings {
            preedit_method: PreeditMethod::Roman,
            punctuation_method: PunctuationMethod::CommaPeriod,
        };
        let table = Table::for_settings(&settings);
        assert_eq!(output_of(table.lookup(",")), Some(("，", "")));
        assert_eq!(output_of(table.lookup(".")), Some(("．", "")));
        // shared after the first build
        assert!(Arc::ptr_eq(&table, &Table::for_settings(&settings)));
        // the built-in table is untouched
        assert_eq!(output_of(Table::default_romaji().lookup(",")), Some(("、", "")));
    }

    #[test]
    fn test_kana_settings_use_twelve_key() {
        let settings = TableSettings {
            preedit_method: PreeditMethod::Kana,
            punctuation_method: PunctuationMethod::KutenTouten,
        };
        assert!(Arc::ptr_eq(&Table::for_settings(&settings), &Table::twelve_key()));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mappings]\nka = \"か\"").unwrap();
        let table = Table::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("k"), TableMatch::Prefix);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Table::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
    }

    #[test]
    fn test_attribute_names() {
        let attrs = Attributes::NEW_CHUNK | Attributes::END_CHUNK;
        assert_eq!(attrs.names(), vec!["new_chunk", "end_chunk"]);
        assert_eq!(Attributes::from_config_name("toggle"), Some(Attributes::TOGGLE));
        assert_eq!(Attributes::from_config_name("bold"), None);
    }
}
