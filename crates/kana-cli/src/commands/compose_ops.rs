use std::sync::Arc;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use kana_composer::{Composer, ComposerData, KeyEvent, SpecialKey, TransliterationType};
use kana_core::settings::Settings;
use kana_core::table::{parse_special_keys, Table};

use super::config_ops;

pub struct ComposeOptions<'a> {
    /// Built-in table name or a table TOML path; the settings pick one when absent.
    pub table: Option<&'a str>,
    pub settings: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ComposeReport {
    keys: String,
    preedit: String,
    cursor: usize,
    raw: String,
    input_mode: TransliterationType,
    conversion_query: String,
    prediction_query: String,
    expanded: Vec<String>,
    transliterations: Vec<(TransliterationType, String)>,
}

fn load_table(name: Option<&str>, settings: &Settings) -> Arc<Table> {
    match name {
        None => Table::for_settings(&settings.table),
        Some("romaji") => Table::default_romaji(),
        Some("twelve_key") => Table::twelve_key(),
        Some(path) => Arc::new(die!(Table::from_file(path), "Error loading table {path}: {}")),
    }
}

/// Type `keys` into a fresh composer and print what it holds. `{!}` and `{<}`
/// in `keys` send the stop and rewind commands.
pub fn compose_cmd(keys: &str, opts: &ComposeOptions) {
    let settings = Arc::new(match opts.settings {
        Some(file) => config_ops::load_settings(file),
        None => kana_core::settings::settings().clone(),
    });
    let table = load_table(opts.table, &settings);
    let mut composer = Composer::new(table, settings);

    if let Some(name) = opts.mode {
        let mode = TransliterationType::from_name(name).unwrap_or_else(|| {
            eprintln!("Unknown mode {name:?}");
            std::process::exit(1);
        });
        composer.set_input_mode(mode);
    }

    let encoded = die!(parse_special_keys(keys), "Error in keys: {}");
    for refused in type_keys(&mut composer, &encoded) {
        eprintln!("warning: {refused:?} refused (max_length {})", composer.max_length());
    }

    let report = build_report(keys, &composer);
    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("JSON serialization failed")
        );
    } else {
        print_report(&report);
    }
}

/// Feed encoded keys to `composer`, sending special keys as commands.
/// Returns the keys the composer refused.
fn type_keys(composer: &mut Composer, encoded: &str) -> Vec<char> {
    let mut refused = Vec::new();
    for c in encoded.chars() {
        match SpecialKey::from_char(c) {
            Some(command) => composer.insert_command_character(command),
            None => {
                if !composer.insert_key_event(&KeyEvent::key(c)) {
                    refused.push(c);
                }
            }
        }
    }
    refused
}

fn build_report(keys: &str, composer: &Composer) -> ComposeReport {
    let (_, expanded) = composer.queries_for_prediction();
    let transliterations = composer
        .transliterations()
        .iter()
        .map(|(t, s)| (t, s.to_string()))
        .collect();
    ComposeReport {
        keys: keys.to_string(),
        preedit: composer.string_for_preedit(),
        cursor: composer.cursor(),
        raw: composer.raw_string(),
        input_mode: composer.input_mode(),
        conversion_query: composer.query_for_conversion(),
        prediction_query: composer.query_for_prediction(),
        expanded: expanded.into_iter().collect(),
        transliterations,
    }
}

fn print_report(report: &ComposeReport) {
    let expanded = report.expanded.join(" ");
    let rows = [
        ("preedit", report.preedit.as_str()),
        ("raw", report.raw.as_str()),
        ("mode", report.input_mode.name()),
        ("conversion", report.conversion_query.as_str()),
        ("prediction", report.prediction_query.as_str()),
        ("expanded", expanded.as_str()),
    ];
    for (label, value) in rows {
        println!("{label:<12} {value}");
    }
    println!("{:<12} {}", "cursor", report.cursor);

    println!();
    let value_width = report
        .transliterations
        .iter()
        .map(|(_, s)| s.width())
        .max()
        .unwrap_or(0);
    for (t, s) in &report.transliterations {
        // pad by display columns so full-width text lines up
        let pad = value_width - s.width();
        println!(
            "{:<24} {}{} {:>3}",
            t.name(),
            s,
            " ".repeat(pad),
            s.chars().count()
        );
    }
}
