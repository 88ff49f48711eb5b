use std::borrow::Cow;

use super::TableError;

/// Command keys that are written as `{name}` in table sources and travel
/// through the composition as private-use characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// `{!}`: end the current toggle cycle.
    StopKeyToggling,
    /// `{<}`: step the current toggle cycle backwards.
    Rewind,
}

impl SpecialKey {
    pub const fn as_char(self) -> char {
        match self {
            Self::StopKeyToggling => '\u{F000}',
            Self::Rewind => '\u{F001}',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\u{F000}' => Some(Self::StopKeyToggling),
            '\u{F001}' => Some(Self::Rewind),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "!" => Some(Self::StopKeyToggling),
            "<" => Some(Self::Rewind),
            _ => None,
        }
    }
}

pub fn is_special_key(c: char) -> bool {
    SpecialKey::from_char(c).is_some()
}

/// Replace `{name}` sequences in a table key with their encoded characters.
/// A brace without a closing partner, or `{}`, is kept literally.
pub fn parse_special_keys(key: &str) -> Result<String, TableError> {
    let mut out = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 => {
                let name = &after[..close];
                let special = SpecialKey::from_name(name)
                    .ok_or_else(|| TableError::UnknownSpecialKey(name.to_string()))?;
                out.push(special.as_char());
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Drop encoded special keys from rendered text.
pub fn strip_special_keys(s: &str) -> Cow<'_, str> {
    if s.chars().any(is_special_key) {
        Cow::Owned(s.chars().filter(|&c| !is_special_key(c)).collect())
    } else {
        Cow::Borrowed(s)
    }
}
