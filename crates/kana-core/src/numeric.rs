//! Number-aware punctuation normalization for conversion queries.
//!
//! Kana input produces "ー", "、" and "。" for the minus, comma and period keys.
//! Around digits those should read as a signed, grouped decimal number, so
//! "ー１、０００。５" becomes "−１，０００．５".

const NUMBER_MINUS: char = '−';
const NUMBER_COMMA: char = '，';
const NUMBER_DOT: char = '．';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Digit,
    Minus,
    Comma,
    Dot,
    Other,
}

fn classify(c: char) -> CharKind {
    match c {
        c if crate::unicode::is_digit(c) => CharKind::Digit,
        'ー' | '－' => CharKind::Minus,
        '、' => CharKind::Comma,
        '。' => CharKind::Dot,
        _ => CharKind::Other,
    }
}

/// Rewrite number punctuation in `query` in place. Returns true when any
/// character changed; a query that is already normalized returns false.
pub fn transform_characters_for_numbers(query: &mut String) -> bool {
    let chars: Vec<char> = query.chars().collect();
    let kinds: Vec<CharKind> = chars.iter().map(|&c| classify(c)).collect();

    let has_digit = kinds.contains(&CharKind::Digit);
    let has_symbol = kinds
        .iter()
        .any(|k| matches!(k, CharKind::Minus | CharKind::Comma | CharKind::Dot));
    if !has_digit || !has_symbol {
        return false;
    }

    let mut transformed = false;
    let mut out = String::with_capacity(query.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev_digit = i > 0 && kinds[i - 1] == CharKind::Digit;
        let next_digit = kinds.get(i + 1) == Some(&CharKind::Digit);
        let replacement = match kinds[i] {
            // A leading sign: the next char is a digit and the previous one is not.
            CharKind::Minus if next_digit && !prev_digit => Some(NUMBER_MINUS),
            CharKind::Comma if prev_digit && next_digit => Some(NUMBER_COMMA),
            CharKind::Dot if prev_digit && next_digit => Some(NUMBER_DOT),
            _ => None,
        };
        match replacement {
            Some(r) => {
                transformed = true;
                out.push(r);
            }
            None => out.push(c),
        }
    }

    if transformed {
        *query = out;
    }
    transformed
}
