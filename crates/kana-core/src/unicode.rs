//! Character-level Unicode classification and width conversion for Japanese text.

/// Check the full Hiragana block (U+3040..U+309F). This includes a few unassigned
/// codepoints (U+3040, U+3097-3098) but these never appear in composed text,
/// so the block-level check is preferred over an exact range.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Half-width katakana and half-width CJK punctuation (U+FF61..U+FF9F).
pub fn is_half_width_katakana(c: char) -> bool {
    ('\u{FF61}'..='\u{FF9F}').contains(&c)
}

/// Full-width ASCII variants (U+FF01..U+FF5E).
pub fn is_full_width_ascii(c: char) -> bool {
    ('\u{FF01}'..='\u{FF5E}').contains(&c)
}

pub fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Half- or full-width decimal digit.
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Convert a hiragana string to katakana.
/// Non-hiragana characters (ー, ASCII, etc.) are passed through unchanged.
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            // ゔ..ゖ and the iteration marks all have katakana twins at +0x60.
            if ('\u{3041}'..='\u{3096}').contains(&c) || ('\u{309D}'..='\u{309E}').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Convert a katakana string to hiragana. ヷ..ヺ have no hiragana twin and pass through.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) || ('\u{30FD}'..='\u{30FE}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Widen printable ASCII (and space) to the full-width forms.
pub fn half_width_ascii_to_full_width_ascii(s: &str) -> String {
    s.chars().map(widen_ascii).collect()
}

/// Narrow full-width ASCII (and the ideographic space) to plain ASCII.
pub fn full_width_ascii_to_half_width_ascii(s: &str) -> String {
    s.chars().map(narrow_ascii).collect()
}

fn widen_ascii(c: char) -> char {
    match c {
        ' ' => IDEOGRAPHIC_SPACE,
        '!'..='~' => char::from_u32(c as u32 - 0x21 + 0xFF01).unwrap_or(c),
        _ => c,
    }
}

fn narrow_ascii(c: char) -> char {
    match c {
        IDEOGRAPHIC_SPACE => ' ',
        c if is_full_width_ascii(c) => char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c),
        _ => c,
    }
}

/// Full-width katakana (and CJK punctuation) paired with its half-width spelling.
/// Voiced forms expand to a base letter plus a separate sound mark.
const KATAKANA_WIDTH_PAIRS: &[(char, &str)] = &[
    ('。', "｡"), ('「', "｢"), ('」', "｣"), ('、', "､"), ('・', "･"), ('ー', "ｰ"),
    ('゛', "ﾞ"), ('゜', "ﾟ"),
    ('ヲ', "ｦ"), ('ァ', "ｧ"), ('ィ', "ｨ"), ('ゥ', "ｩ"), ('ェ', "ｪ"), ('ォ', "ｫ"),
    ('ャ', "ｬ"), ('ュ', "ｭ"), ('ョ', "ｮ"), ('ッ', "ｯ"),
    ('ア', "ｱ"), ('イ', "ｲ"), ('ウ', "ｳ"), ('エ', "ｴ"), ('オ', "ｵ"),
    ('カ', "ｶ"), ('キ', "ｷ"), ('ク', "ｸ"), ('ケ', "ｹ"), ('コ', "ｺ"),
    ('サ', "ｻ"), ('シ', "ｼ"), ('ス', "ｽ"), ('セ', "ｾ"), ('ソ', "ｿ"),
    ('タ', "ﾀ"), ('チ', "ﾁ"), ('ツ', "ﾂ"), ('テ', "ﾃ"), ('ト', "ﾄ"),
    ('ナ', "ﾅ"), ('ニ', "ﾆ"), ('ヌ', "ﾇ"), ('ネ', "ﾈ"), ('ノ', "ﾉ"),
    ('ハ', "ﾊ"), ('ヒ', "ﾋ"), ('フ', "ﾌ"), ('ヘ', "ﾍ"), ('ホ', "ﾎ"),
    ('マ', "ﾏ"), ('ミ', "ﾐ"), ('ム', "ﾑ"), ('メ', "ﾒ"), ('モ', "ﾓ"),
    ('ヤ', "ﾔ"), ('ユ', "ﾕ"), ('ヨ', "ﾖ"),
    ('ラ', "ﾗ"), ('リ', "ﾘ"), ('ル', "ﾙ"), ('レ', "ﾚ"), ('ロ', "ﾛ"),
    ('ワ', "ﾜ"), ('ン', "ﾝ"),
    ('ガ', "ｶﾞ"), ('ギ', "ｷﾞ"), ('グ', "ｸﾞ"), ('ゲ', "ｹﾞ"), ('ゴ', "ｺﾞ"),
    ('ザ', "ｻﾞ"), ('ジ', "ｼﾞ"), ('ズ', "ｽﾞ"), ('ゼ', "ｾﾞ"), ('ゾ', "ｿﾞ"),
    ('ダ', "ﾀﾞ"), ('ヂ', "ﾁﾞ"), ('ヅ', "ﾂﾞ"), ('デ', "ﾃﾞ"), ('ド', "ﾄﾞ"),
    ('バ', "ﾊﾞ"), ('ビ', "ﾋﾞ"), ('ブ', "ﾌﾞ"), ('ベ', "ﾍﾞ"), ('ボ', "ﾎﾞ"),
    ('パ', "ﾊﾟ"), ('ピ', "ﾋﾟ"), ('プ', "ﾌﾟ"), ('ペ', "ﾍﾟ"), ('ポ', "ﾎﾟ"),
    ('ヴ', "ｳﾞ"), ('ヷ', "ﾜﾞ"), ('ヺ', "ｦﾞ"),
];

fn half_katakana_of(c: char) -> Option<&'static str> {
    KATAKANA_WIDTH_PAIRS
        .iter()
        .find(|(full, _)| *full == c)
        .map(|(_, half)| *half)
}

fn full_katakana_of(half: &str) -> Option<char> {
    KATAKANA_WIDTH_PAIRS
        .iter()
        .find(|(_, h)| *h == half)
        .map(|(full, _)| *full)
}

/// Widen half-width ASCII and half-width katakana. A half-width letter followed by
/// a sound mark is folded into the single voiced full-width letter.
pub fn half_width_to_full_width(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_half_width_katakana(c) {
            if let Some(&mark) = chars.get(i + 1) {
                if mark == 'ﾞ' || mark == 'ﾟ' {
                    let pair: String = [c, mark].iter().collect();
                    if let Some(full) = full_katakana_of(&pair) {
                        out.push(full);
                        i += 2;
                        continue;
                    }
                }
            }
            let single = c.to_string();
            out.push(full_katakana_of(&single).unwrap_or(c));
        } else {
            out.push(widen_ascii(c));
        }
        i += 1;
    }
    out
}

/// Narrow full-width ASCII and full-width katakana. Letters without a half-width
/// form (ヮ, ヵ, ヶ, hiragana, kanji) pass through unchanged.
pub fn full_width_to_half_width(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match half_katakana_of(c) {
            Some(half) => out.push_str(half),
            None => out.push(narrow_ascii(c)),
        }
    }
    out
}

/// Check if a string is a valid hiragana reading.
///
/// Accepts hiragana characters and the prolonged sound mark ー (U+30FC,
/// technically katakana) which commonly appears in readings like "らーめん".
pub fn is_hiragana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_hiragana(c) || c == 'ー')
}
