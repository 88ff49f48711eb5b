//! Chunk-level edits: feeding steps, re-resolving raw keys, splitting and
//! deleting inside a chunk.

use kana_core::table::{SpecialKey, Table};
use kana_core::transliteration::Transliterator;

use crate::chunk::{CharChunk, Step};

/// Feed one step into `chunks` at chunk index `index` (the number of chunks
/// before the insertion point). Returns the index after the touched chunk.
pub(crate) fn insert_step(
    chunks: &mut Vec<CharChunk>,
    index: usize,
    step: Step<'_>,
    is_new_input: bool,
    table: &Table,
    transliterator: Transliterator,
) -> usize {
    if let Step::Key(c) = step {
        if let Some(command) = SpecialKey::from_char(c) {
            // a command only acts on a chunk that is still waiting for input
            if let Some(left) = index.checked_sub(1).and_then(|i| chunks.get_mut(i)) {
                if left.has_pending() {
                    left.add_command(table, command);
                }
            }
            return index;
        }
    }

    if let Some(left) = index.checked_sub(1).and_then(|i| chunks.get_mut(i)) {
        if left.is_appendable(step, is_new_input, table, transliterator) {
            if left.add_step(table, step) {
                return index;
            }
            left.freeze();
        }
    }

    let mut chunk = CharChunk::new(transliterator);
    chunk.add_step(table, step);
    chunks.insert(index, chunk);
    index + 1
}

/// Replay raw keys through the table into fresh chunks.
pub(crate) fn resolve(table: &Table, transliterator: Transliterator, raw: &[char]) -> Vec<CharChunk> {
    let mut chunks = Vec::new();
    let mut index = 0;
    for &c in raw {
        index = insert_step(&mut chunks, index, Step::Key(c), false, table, transliterator);
    }
    chunks
}

pub(crate) fn render(chunks: &[CharChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.render(Transliterator::Local))
        .collect()
}

fn render_chars(chunks: &[CharChunk]) -> Vec<char> {
    render(chunks).chars().collect()
}

fn text_of(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Split a chunk at `pos` characters into its own rendering
/// (`0 < pos < length`). Each side keeps the raw keys that rebuild its text;
/// when no split of the raw keys does, both sides become literal chunks that
/// still share out the raw keys.
pub(crate) fn split_chunk(
    chunk: &CharChunk,
    pos: usize,
    table: &Table,
) -> (Vec<CharChunk>, Vec<CharChunk>) {
    let t12r = chunk.transliterator();
    let raw: Vec<char> = chunk.raw().chars().collect();
    let text: Vec<char> = chunk.render(Transliterator::Local).chars().collect();
    let pos = pos.min(text.len());
    let (left_text, right_text) = text.split_at(pos);

    if chunk.effective(Transliterator::Local).uses_raw() {
        let k = pos.min(raw.len());
        if chunk.is_literal() {
            return (
                literal_chunks(&raw[..k], &raw[..k], t12r),
                literal_chunks(&raw[k..], &raw[k..], t12r),
            );
        }
        return (resolve(table, t12r, &raw[..k]), resolve(table, t12r, &raw[k..]));
    }

    if !chunk.is_literal() {
        for k in 1..raw.len() {
            let left = resolve(table, t12r, &raw[..k]);
            if render_chars(&left) != left_text {
                continue;
            }
            let right = resolve(table, t12r, &raw[k..]);
            if render_chars(&right) == right_text {
                return (left, right);
            }
        }
    }

    let k = if raw == text {
        pos
    } else if raw.len() >= 2 {
        pos.clamp(1, raw.len() - 1)
    } else {
        raw.len()
    };
    (
        literal_chunks(&raw[..k], left_text, t12r),
        literal_chunks(&raw[k..], right_text, t12r),
    )
}

fn literal_chunks(raw: &[char], text: &[char], t12r: Transliterator) -> Vec<CharChunk> {
    if raw.is_empty() && text.is_empty() {
        Vec::new()
    } else {
        vec![CharChunk::literal(text_of(raw), text_of(text), t12r)]
    }
}

/// Result of deleting one character inside a chunk.
pub(crate) struct Deletion {
    pub chunks: Vec<CharChunk>,
    /// Cursor offset inside the replacement chunks.
    pub cursor: usize,
}

/// Delete the character at `pos` of a chunk's own rendering.
///
/// Removing the last character of a multi-key chunk drops the last key and
/// replays the rest, so `kya` loses `a` and reads `ky` again. Anywhere else
/// the chunk is split around the removed character: the left side keeps the
/// longest run of leading keys that rebuilds the left text, the right side
/// the shortest run of trailing keys that rebuilds the right text. A side
/// that no keys rebuild becomes literal text.
pub(crate) fn delete_in_chunk(chunk: &CharChunk, pos: usize, table: &Table) -> Deletion {
    let t12r = chunk.transliterator();
    let raw: Vec<char> = chunk.raw().chars().collect();
    let text: Vec<char> = chunk.render(Transliterator::Local).chars().collect();
    if text.len() <= 1 || pos >= text.len() {
        return Deletion {
            chunks: Vec::new(),
            cursor: 0,
        };
    }

    if !chunk.is_literal() && pos == text.len() - 1 && raw.len() > 1 {
        let chunks = resolve(table, t12r, &raw[..raw.len() - 1]);
        let cursor = render_chars(&chunks).len();
        return Deletion { chunks, cursor };
    }

    let left_text = &text[..pos];
    let right_text = &text[pos + 1..];

    if chunk.is_literal() {
        let mut rest = left_text.to_vec();
        rest.extend_from_slice(right_text);
        return Deletion {
            chunks: literal_chunks(&rest, &rest, t12r),
            cursor: pos,
        };
    }

    if chunk.effective(Transliterator::Local).uses_raw() {
        let mut chunks = resolve(table, t12r, &raw[..pos.min(raw.len())]);
        chunks.extend(resolve(table, t12r, raw.get(pos + 1..).unwrap_or(&[])));
        return Deletion {
            chunks,
            cursor: pos,
        };
    }

    let left = (0..=raw.len()).rev().find_map(|i| {
        let chunks = resolve(table, t12r, &raw[..i]);
        (render_chars(&chunks) == left_text).then_some((i, chunks))
    });
    let lower = left.as_ref().map_or(0, |(i, _)| *i);
    let right = (lower..=raw.len()).rev().find_map(|j| {
        let chunks = resolve(table, t12r, &raw[j..]);
        (render_chars(&chunks) == right_text).then_some(chunks)
    });

    let mut chunks = match left {
        Some((_, chunks)) => chunks,
        None => literal_chunks(left_text, left_text, t12r),
    };
    chunks.extend(right.unwrap_or_else(|| literal_chunks(right_text, right_text, t12r)));
    Deletion {
        chunks,
        cursor: pos,
    }
}
