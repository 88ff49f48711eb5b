use std::collections::BTreeSet;

use kana_core::table::{strip_special_keys, Attributes, Rule, SpecialKey, Table, TableMatch};
use kana_core::transliteration::Transliterator;

/// Input handed to a composition in one call: typed keys, or a key together
/// with text that was already resolved elsewhere (kana keyboards, handwriting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionInput {
    raw: String,
    preedit: Option<String>,
    is_new_input: bool,
}

impl CompositionInput {
    pub fn from_raw(raw: impl Into<String>, is_new_input: bool) -> Self {
        Self {
            raw: raw.into(),
            preedit: None,
            is_new_input,
        }
    }

    pub fn from_raw_and_preedit(
        raw: impl Into<String>,
        preedit: impl Into<String>,
        is_new_input: bool,
    ) -> Self {
        Self {
            raw: raw.into(),
            preedit: Some(preedit.into()),
            is_new_input,
        }
    }

    pub fn from_command(command: SpecialKey) -> Self {
        Self::from_raw(command.as_char().to_string(), false)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn preedit(&self) -> Option<&str> {
        self.preedit.as_deref()
    }

    pub fn is_new_input(&self) -> bool {
        self.is_new_input
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.preedit.as_deref().map_or(true, str::is_empty)
    }
}

/// A single unit of chunk input.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step<'a> {
    Key(char),
    Preedit { key: &'a str, text: &'a str },
}

impl Step<'_> {
    fn first_char(&self) -> Option<char> {
        match self {
            Step::Key(c) => Some(*c),
            Step::Preedit { text, .. } => text.chars().next(),
        }
    }
}

/// The atomic unit of a composition: the keys typed for it and what they
/// resolved to so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharChunk {
    raw: String,
    conversion: String,
    pending: String,
    /// What `pending` settles to if no further key arrives (`n` → `ん`).
    ambiguous: Option<String>,
    attributes: Attributes,
    transliterator: Transliterator,
    /// `raw` cannot be replayed through the table to rebuild the chunk.
    literal: bool,
}

impl CharChunk {
    pub fn new(transliterator: Transliterator) -> Self {
        Self {
            raw: String::new(),
            conversion: String::new(),
            pending: String::new(),
            ambiguous: None,
            attributes: Attributes::empty(),
            transliterator,
            literal: false,
        }
    }

    pub(crate) fn literal(raw: String, text: String, transliterator: Transliterator) -> Self {
        Self {
            raw,
            conversion: text,
            literal: true,
            ..Self::new(transliterator)
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn conversion(&self) -> &str {
        &self.conversion
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn ambiguous(&self) -> Option<&str> {
        self.ambiguous.as_deref()
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn transliterator(&self) -> Transliterator {
        self.transliterator
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.conversion.is_empty() && self.pending.is_empty()
    }

    pub(crate) fn set_transliterator(&mut self, transliterator: Transliterator) {
        self.transliterator = transliterator;
    }

    pub(crate) fn is_appendable(
        &self,
        step: Step<'_>,
        is_new_input: bool,
        table: &Table,
        transliterator: Transliterator,
    ) -> bool {
        if self.pending.is_empty()
            || self.transliterator != transliterator
            || self.attributes.contains(Attributes::END_CHUNK)
        {
            return false;
        }
        let starts_new_chunk =
            is_new_input && step.first_char().is_some_and(|c| table.has_new_chunk_entry(c));
        !starts_new_chunk
    }

    /// Feed one step. Returns false when the step does not continue this
    /// chunk; a fresh chunk always takes it.
    pub(crate) fn add_step(&mut self, table: &Table, step: Step<'_>) -> bool {
        match step {
            Step::Key(c) => self.add_key(table, c),
            Step::Preedit { key, text } => self.add_preedit(table, key, text),
        }
    }

    fn add_key(&mut self, table: &Table, c: char) -> bool {
        match table.lookup_next(&self.pending, c) {
            TableMatch::None => {
                if !self.is_empty() {
                    return false;
                }
                self.raw.push(c);
                self.conversion.push(c);
            }
            TableMatch::Prefix | TableMatch::ExactAndPrefix(_) => {
                self.raw.push(c);
                self.pending.push(c);
                self.refresh_ambiguous(table);
            }
            TableMatch::Exact(rule) => {
                self.raw.push(c);
                self.apply(table, rule);
            }
        }
        true
    }

    fn add_preedit(&mut self, table: &Table, key: &str, text: &str) -> bool {
        let key_text = format!("{}{}", self.pending, text);
        match table.lookup(&key_text) {
            TableMatch::None => {
                if !self.is_empty() {
                    return false;
                }
                self.raw.push_str(key);
                self.conversion.push_str(text);
            }
            TableMatch::Prefix | TableMatch::ExactAndPrefix(_) => {
                self.raw.push_str(key);
                self.pending = key_text;
                self.refresh_ambiguous(table);
            }
            TableMatch::Exact(rule) => {
                self.raw.push_str(key);
                self.apply(table, rule);
            }
        }
        self.literal = true;
        true
    }

    /// Apply a command key. Commands are never recorded in `raw`.
    pub(crate) fn add_command(&mut self, table: &Table, command: SpecialKey) {
        match table.lookup_next(&self.pending, command.as_char()) {
            TableMatch::Exact(rule) | TableMatch::ExactAndPrefix(rule) => self.apply(table, rule),
            TableMatch::Prefix | TableMatch::None => {
                if command == SpecialKey::StopKeyToggling {
                    self.freeze();
                }
            }
        }
    }

    fn apply(&mut self, table: &Table, rule: &Rule) {
        self.conversion.push_str(&strip_special_keys(&rule.output));
        self.pending.clone_from(&rule.pending);
        self.attributes = rule.attributes;
        self.refresh_ambiguous(table);
    }

    fn refresh_ambiguous(&mut self, table: &Table) {
        self.ambiguous = if self.pending.is_empty() {
            None
        } else {
            match table.lookup(&self.pending) {
                TableMatch::Exact(rule) | TableMatch::ExactAndPrefix(rule) => {
                    Some(format!("{}{}", rule.output, rule.pending))
                }
                TableMatch::Prefix | TableMatch::None => None,
            }
        };
    }

    /// Settle the pending fragment as final text: its ambiguous resolution
    /// if it has one, the fragment itself otherwise.
    pub(crate) fn freeze(&mut self) {
        let tail = self.ambiguous.take().unwrap_or_else(|| self.pending.clone());
        self.conversion.push_str(&strip_special_keys(&tail));
        self.pending.clear();
    }

    fn converted(&self) -> String {
        let mut s = strip_special_keys(&self.conversion).into_owned();
        s.push_str(&strip_special_keys(&self.pending));
        s
    }

    /// Transliterator actually applied for a requested one.
    pub(crate) fn effective(&self, transliterator: Transliterator) -> Transliterator {
        let t = match transliterator {
            Transliterator::Local => self.transliterator,
            other => other,
        };
        if t.uses_raw() && self.attributes.contains(Attributes::NO_TRANSLITERATION) {
            Transliterator::ConversionString
        } else {
            t
        }
    }

    pub fn render(&self, transliterator: Transliterator) -> String {
        self.effective(transliterator)
            .transliterate(&self.raw, &self.converted())
    }

    pub fn length(&self, transliterator: Transliterator) -> usize {
        self.effective(transliterator)
            .length(&self.raw, &self.converted())
    }

    /// Rendering with the pending fragment settled.
    pub fn fixed(&self) -> String {
        let mut converted = self.conversion.clone();
        converted.push_str(self.ambiguous.as_deref().unwrap_or(&self.pending));
        self.effective(Transliterator::Local)
            .transliterate(&self.raw, &strip_special_keys(&converted))
    }

    /// Rendering with only determined text: a pending fragment survives
    /// only when the table maps it to itself.
    pub fn trimmed(&self, table: &Table) -> String {
        let mut converted = self.conversion.clone();
        if !self.pending.is_empty() {
            if let TableMatch::Exact(rule) | TableMatch::ExactAndPrefix(rule) =
                table.lookup(&self.pending)
            {
                if rule.input == rule.output {
                    converted.push_str(&rule.output);
                }
            }
        }
        self.effective(Transliterator::Local)
            .transliterate(&self.raw, &strip_special_keys(&converted))
    }

    /// Completions the pending fragment could still turn into.
    pub fn expanded(&self, table: &Table) -> BTreeSet<String> {
        let mut results = BTreeSet::new();
        if self.pending.is_empty() {
            return results;
        }
        if self.conversion.is_empty() {
            results.insert(strip_special_keys(&self.pending).into_owned());
        }
        for rule in table.lookup_predictive(&self.pending) {
            if rule.pending.is_empty() && !rule.output.is_empty() {
                results.insert(rule.output.clone());
            }
        }
        results
    }

    pub fn should_commit(&self) -> bool {
        self.attributes.contains(Attributes::DIRECT_INPUT) && self.pending.is_empty()
    }

    pub fn is_toggleable(&self) -> bool {
        !self.pending.is_empty() && self.attributes.contains(Attributes::TOGGLE)
    }
}
