use kana_core::transliteration::Transliterator;

use crate::chunk::CharChunk;

/// Map a position measured in `from` renderings to `to` renderings.
///
/// Chunk boundaries map to chunk boundaries. An offset inside a chunk keeps
/// its value, clamped to the chunk's length under `to`. Positions past the
/// end clamp to the end.
pub(crate) fn convert_position(
    chunks: &[CharChunk],
    pos: usize,
    from: Transliterator,
    to: Transliterator,
) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut remaining = pos;
    let mut converted = 0;
    for chunk in chunks {
        let from_len = chunk.length(from);
        let to_len = chunk.length(to);
        if remaining <= from_len {
            return if remaining == from_len {
                converted + to_len
            } else {
                converted + remaining.min(to_len)
            };
        }
        remaining -= from_len;
        converted += to_len;
    }
    converted
}

/// Characters `[pos, pos + size)` in local space, rendered with `t`.
pub(crate) fn sub_string(
    chunks: &[CharChunk],
    t: Transliterator,
    pos: usize,
    size: usize,
) -> String {
    let rendered: Vec<char> = chunks
        .iter()
        .map(|c| c.render(t))
        .collect::<String>()
        .chars()
        .collect();
    let start = convert_position(chunks, pos, Transliterator::Local, t).min(rendered.len());
    let end = convert_position(chunks, pos.saturating_add(size), Transliterator::Local, t)
        .clamp(start, rendered.len());
    rendered[start..end].iter().collect()
}

/// Chunk holding the character just before `pos`, with the offset of its
/// first character.
pub(crate) fn chunk_before(chunks: &[CharChunk], pos: usize) -> Option<(usize, usize)> {
    let mut start = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        let end = start + chunk.length(Transliterator::Local);
        if start < pos && pos <= end {
            return Some((i, start));
        }
        start = end;
    }
    None
}

/// Chunk holding the character at `pos`, with the offset of its first
/// character.
pub(crate) fn chunk_at(chunks: &[CharChunk], pos: usize) -> Option<(usize, usize)> {
    chunk_before(chunks, pos.checked_add(1)?)
}
