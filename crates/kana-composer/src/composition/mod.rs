//! Ordered, cursor-addressable sequence of chunks.
//!
//! Positions are composed-character offsets in the local rendering (each
//! chunk through its own transliterator), always within `0..=len()`. The
//! composition does not own a cursor; callers pass positions in and get the
//! resulting position back.

mod edit;
mod position;

use std::collections::BTreeSet;
use std::sync::Arc;

use kana_core::table::Table;
use kana_core::transliteration::Transliterator;
use tracing::{debug, debug_span};

use crate::chunk::{CharChunk, CompositionInput, Step};

/// How pending fragments are rendered in whole-string queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    /// Drop pending fragments that the table does not map to themselves.
    Trim,
    /// Render pending fragments as typed.
    Asis,
    /// Settle pending fragments to what they would resolve to.
    Fix,
}

#[derive(Debug, Clone)]
pub struct Composition {
    chunks: Vec<CharChunk>,
    table: Arc<Table>,
    input_transliterator: Transliterator,
}

impl Composition {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            chunks: Vec::new(),
            table,
            input_transliterator: Transliterator::Hiragana,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Swap the rule table. Existing chunks keep what they already resolved.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.table = table;
    }

    pub fn input_transliterator(&self) -> Transliterator {
        self.input_transliterator
    }

    /// Transliterator given to chunks created from now on.
    pub fn set_input_transliterator(&mut self, transliterator: Transliterator) {
        self.input_transliterator = transliterator;
    }

    pub fn chunks(&self) -> &[CharChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| c.length(Transliterator::Local))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn erase(&mut self) {
        self.chunks.clear();
    }

    /// Insert `input` at `pos` and return the position just after it.
    pub fn insert_at(&mut self, pos: usize, input: &CompositionInput) -> usize {
        let _span = debug_span!("insert_at", pos, raw = input.raw()).entered();
        if input.is_empty() {
            return pos.min(self.len());
        }
        let mut index = self.split_at(pos);
        let t12r = self.input_transliterator;
        let table = Arc::clone(&self.table);
        match input.preedit() {
            Some(text) => {
                let step = Step::Preedit {
                    key: input.raw(),
                    text,
                };
                index = edit::insert_step(
                    &mut self.chunks,
                    index,
                    step,
                    input.is_new_input(),
                    &table,
                    t12r,
                );
            }
            None => {
                let mut is_new_input = input.is_new_input();
                for c in input.raw().chars() {
                    index = edit::insert_step(
                        &mut self.chunks,
                        index,
                        Step::Key(c),
                        is_new_input,
                        &table,
                        t12r,
                    );
                    is_new_input = false;
                }
            }
        }
        self.position_of_index(index)
    }

    /// Delete the character at `pos` and return where the cursor lands.
    pub fn delete_at(&mut self, pos: usize) -> usize {
        let _span = debug_span!("delete_at", pos).entered();
        let Some((index, start)) = position::chunk_at(&self.chunks, pos) else {
            return pos.min(self.len());
        };
        let deletion = edit::delete_in_chunk(&self.chunks[index], pos - start, &self.table);
        self.chunks.splice(index..=index, deletion.chunks);
        start + deletion.cursor
    }

    /// Split the chunk straddling `pos`, if any, and return the number of
    /// chunks left of `pos`.
    pub(crate) fn split_at(&mut self, pos: usize) -> usize {
        let mut start = 0;
        for i in 0..self.chunks.len() {
            if pos <= start {
                return i;
            }
            let len = self.chunks[i].length(Transliterator::Local);
            if pos < start + len {
                let (left, right) = edit::split_chunk(&self.chunks[i], pos - start, &self.table);
                if left.iter().chain(&right).any(CharChunk::is_literal) {
                    debug!(pos, raw = self.chunks[i].raw(), "split into literal chunks");
                }
                let left_len = left.len();
                self.chunks.splice(i..=i, left.into_iter().chain(right));
                return i + left_len;
            }
            start += len;
        }
        self.chunks.len()
    }

    fn position_of_index(&self, index: usize) -> usize {
        self.chunks[..index]
            .iter()
            .map(|c| c.length(Transliterator::Local))
            .sum()
    }

    pub fn string(&self) -> String {
        self.string_with(Transliterator::Local)
    }

    pub fn string_with(&self, transliterator: Transliterator) -> String {
        self.chunks.iter().map(|c| c.render(transliterator)).collect()
    }

    pub fn string_with_trim_mode(&self, mode: TrimMode) -> String {
        match mode {
            TrimMode::Asis => self.string(),
            TrimMode::Fix => self.chunks.iter().map(CharChunk::fixed).collect(),
            TrimMode::Trim => self.chunks.iter().map(|c| c.trimmed(&self.table)).collect(),
        }
    }

    pub fn raw_string(&self) -> String {
        self.chunks.iter().map(CharChunk::raw).collect()
    }

    /// `[pos, pos + size)` of the local string, rendered with `transliterator`.
    pub fn sub_string(&self, transliterator: Transliterator, pos: usize, size: usize) -> String {
        position::sub_string(&self.chunks, transliterator, pos, size)
    }

    pub fn raw_sub_string(&self, pos: usize, size: usize) -> String {
        self.sub_string(Transliterator::RawString, pos, size)
    }

    pub fn convert_position(&self, pos: usize, from: Transliterator, to: Transliterator) -> usize {
        position::convert_position(&self.chunks, pos, from, to)
    }

    /// Raw keystroke offset of a composed position.
    pub fn raw_offset_of(&self, pos: usize) -> usize {
        self.convert_position(pos, Transliterator::Local, Transliterator::RawString)
    }

    /// Composed position of a raw keystroke offset.
    pub fn composed_offset_of(&self, raw_pos: usize) -> usize {
        self.convert_position(raw_pos, Transliterator::RawString, Transliterator::Local)
    }

    /// Prediction base and the completions of the last chunk's pending
    /// fragment. Earlier chunks are settled; the last is trimmed.
    pub fn expanded_strings(&self) -> (String, BTreeSet<String>) {
        let Some((last, head)) = self.chunks.split_last() else {
            return (String::new(), BTreeSet::new());
        };
        let mut base: String = head.iter().map(CharChunk::fixed).collect();
        base.push_str(&last.trimmed(&self.table));
        (base, last.expanded(&self.table))
    }

    /// Transliterator of the chunk holding the character before `pos`; the
    /// input transliterator when there is none.
    pub fn transliterator_at(&self, pos: usize) -> Transliterator {
        position::chunk_before(&self.chunks, pos)
            .map_or(self.input_transliterator, |(i, _)| {
                self.chunks[i].transliterator()
            })
    }

    /// Re-render `[from, to)` with `transliterator`, splitting chunks at both
    /// ends as needed.
    pub fn set_transliterator(&mut self, from: usize, to: usize, transliterator: Transliterator) {
        if from >= to {
            return;
        }
        // splits keep the local rendering, so `to` is still valid afterwards
        let begin = self.split_at(from);
        let end = self.split_at(to);
        for chunk in &mut self.chunks[begin..end] {
            chunk.set_transliterator(transliterator);
        }
    }

    /// Every chunk is direct input with nothing pending.
    pub fn should_commit(&self) -> bool {
        !self.chunks.is_empty() && self.chunks.iter().all(CharChunk::should_commit)
    }

    /// The chunk ending at `pos` is mid-way through a toggle cycle.
    pub fn is_toggleable(&self, pos: usize) -> bool {
        position::chunk_before(&self.chunks, pos).is_some_and(|(i, _)| self.chunks[i].is_toggleable())
    }
}
