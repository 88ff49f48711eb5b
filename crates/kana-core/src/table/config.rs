use std::collections::BTreeMap;

use serde::Deserialize;

use super::special_key::{parse_special_keys, SpecialKey};
use super::{Attributes, Rule};

#[derive(Deserialize)]
struct TableSource {
    #[serde(default)]
    mappings: BTreeMap<String, RuleSource>,
    #[serde(default)]
    toggles: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleSource {
    Output(String),
    Full {
        #[serde(default)]
        output: String,
        #[serde(default)]
        pending: String,
        #[serde(default)]
        attributes: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("table has no rules")]
    Empty,
    #[error("empty key in [{0}]")]
    EmptyKey(&'static str),
    #[error("rule {0:?} has neither output nor pending")]
    EmptyRule(String),
    #[error("unknown attribute {attribute:?} on rule {key:?}")]
    UnknownAttribute { key: String, attribute: String },
    #[error("unknown special key {{{0}}}")]
    UnknownSpecialKey(String),
    #[error("toggle group {0:?} needs at least two alternatives")]
    ToggleTooShort(String),
    #[error("duplicate key: {0:?}")]
    DuplicateKey(String),
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse table TOML into rules, in source order: `[mappings]` first, then
/// the rules expanded from `[toggles]`.
pub fn parse_table_toml(toml_str: &str) -> Result<Vec<Rule>, TableError> {
    let source: TableSource =
        toml::from_str(toml_str).map_err(|e| TableError::Parse(e.to_string()))?;

    if source.mappings.is_empty() && source.toggles.is_empty() {
        return Err(TableError::Empty);
    }

    let mut rules = Vec::with_capacity(source.mappings.len() + source.toggles.len() * 8);
    for (key, rule) in &source.mappings {
        if key.is_empty() {
            return Err(TableError::EmptyKey("mappings"));
        }
        rules.push(mapping_rule(key, rule)?);
    }
    for (key, alternatives) in &source.toggles {
        if key.is_empty() {
            return Err(TableError::EmptyKey("toggles"));
        }
        expand_toggle(key, alternatives, &mut rules)?;
    }
    Ok(rules)
}

fn mapping_rule(key: &str, source: &RuleSource) -> Result<Rule, TableError> {
    let input = parse_special_keys(key)?;
    let rule = match source {
        RuleSource::Output(output) => Rule {
            input,
            output: output.clone(),
            pending: String::new(),
            attributes: Attributes::empty(),
        },
        RuleSource::Full {
            output,
            pending,
            attributes,
        } => {
            let mut attrs = Attributes::empty();
            for name in attributes {
                attrs |= Attributes::from_config_name(name).ok_or_else(|| {
                    TableError::UnknownAttribute {
                        key: key.to_string(),
                        attribute: name.clone(),
                    }
                })?;
            }
            Rule {
                input,
                output: output.clone(),
                pending: parse_special_keys(pending)?,
                attributes: attrs,
            }
        }
    };
    if rule.output.is_empty() && rule.pending.is_empty() {
        return Err(TableError::EmptyRule(key.to_string()));
    }
    Ok(rule)
}

/// A toggle group `key = [a0, a1, .., an]` becomes a pending chain:
/// `key` starts at `a0`, `ai + key` moves forward and `ai + {<}` moves back,
/// both wrapping around.
fn expand_toggle(key: &str, alternatives: &[String], rules: &mut Vec<Rule>) -> Result<(), TableError> {
    if alternatives.len() < 2 {
        return Err(TableError::ToggleTooShort(key.to_string()));
    }
    let input = parse_special_keys(key)?;
    let alternatives = alternatives
        .iter()
        .map(|alt| {
            if alt.is_empty() {
                Err(TableError::EmptyRule(key.to_string()))
            } else {
                parse_special_keys(alt)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let n = alternatives.len();
    rules.push(Rule {
        input: input.clone(),
        output: String::new(),
        pending: alternatives[0].clone(),
        attributes: Attributes::NEW_CHUNK | Attributes::TOGGLE,
    });
    for (i, alt) in alternatives.iter().enumerate() {
        rules.push(Rule {
            input: format!("{alt}{input}"),
            output: String::new(),
            pending: alternatives[(i + 1) % n].clone(),
            attributes: Attributes::TOGGLE,
        });
        rules.push(Rule {
            input: format!("{alt}{}", SpecialKey::Rewind.as_char()),
            output: String::new(),
            pending: alternatives[(i + n - 1) % n].clone(),
            attributes: Attributes::TOGGLE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_full_rules() {
        let toml = r#"
[mappings]
a = "あ"
kk = { output = "っ", pending = "k" }
"@" = { output = "＠", attributes = ["direct_input"] }
"#;
        let rules = parse_table_toml(toml).unwrap();
        assert_eq!(rules.len(), 3);
        let kk = rules.iter().find(|r| r.input == "kk").unwrap();
        assert_eq!(kk.output, "っ");
        assert_eq!(kk.pending, "k");
        let at = rules.iter().find(|r| r.input == "@").unwrap();
        assert_eq!(at.attributes, Attributes::DIRECT_INPUT);
    }

    #[test]
    fn toggle_group_expands_to_chain() {
        let toml = r#"
[toggles]
"1" = ["あ", "い", "う"]
"#;
        let rules = parse_table_toml(toml).unwrap();
        // start rule + (forward + rewind) per alternative
        assert_eq!(rules.len(), 1 + 2 * 3);
        let start = rules.iter().find(|r| r.input == "1").unwrap();
        assert_eq!(start.pending, "あ");
        assert!(start.attributes.contains(Attributes::NEW_CHUNK | Attributes::TOGGLE));
        let wrap = rules.iter().find(|r| r.input == "う1").unwrap();
        assert_eq!(wrap.pending, "あ");
        let back = format!("あ{}", SpecialKey::Rewind.as_char());
        let rewind = rules.iter().find(|r| r.input == back).unwrap();
        assert_eq!(rewind.pending, "う");
    }

    #[test]
    fn error_empty_table() {
        let err = parse_table_toml("[mappings]\n").unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn error_empty_key() {
        let err = parse_table_toml("[mappings]\n\"\" = \"あ\"\n").unwrap_err();
        assert!(matches!(err, TableError::EmptyKey("mappings")));
    }

    #[test]
    fn error_empty_rule() {
        let err = parse_table_toml("[mappings]\na = \"\"\n").unwrap_err();
        assert!(matches!(err, TableError::EmptyRule(ref k) if k == "a"));
    }

    #[test]
    fn error_unknown_attribute() {
        let toml = r#"
[mappings]
a = { output = "あ", attributes = ["sticky"] }
"#;
        let err = parse_table_toml(toml).unwrap_err();
        assert!(err.to_string().contains("sticky"));
    }

    #[test]
    fn error_unknown_special_key() {
        let err = parse_table_toml("[mappings]\n\"a{?}\" = \"x\"\n").unwrap_err();
        assert!(matches!(err, TableError::UnknownSpecialKey(_)));
    }

    #[test]
    fn error_short_toggle() {
        let err = parse_table_toml("[toggles]\n\"1\" = [\"あ\"]\n").unwrap_err();
        assert!(matches!(err, TableError::ToggleTooShort(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_table_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }
}
