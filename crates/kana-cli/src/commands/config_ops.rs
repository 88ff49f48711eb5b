use std::fs;

use kana_core::settings::{self, Settings};
use kana_core::table::{Table, DEFAULT_ROMAJI_TOML, TWELVE_KEY_TOML};

/// Built-in table sources by name.
pub const TABLE_NAMES: [&str; 2] = ["romaji", "twelve_key"];

pub fn table_export(name: &str) {
    let source = match name {
        "romaji" => DEFAULT_ROMAJI_TOML,
        "twelve_key" => TWELVE_KEY_TOML,
        other => {
            eprintln!("Unknown table {other:?} (expected one of {TABLE_NAMES:?})");
            std::process::exit(1);
        }
    };
    print!("{source}");
}

pub fn table_validate(file: &str) {
    let table = die!(Table::from_file(file), "Error in {file}: {}");
    let case = if table.is_case_sensitive() {
        "case-sensitive"
    } else {
        "case-insensitive"
    };
    println!("OK: {} rules ({case})", table.len());
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = load_settings(file);
    let cycle: Vec<&str> = s.composer.toggle_cycle.iter().map(|t| t.name()).collect();
    println!(
        "OK: composer.max_length={}, composer.timeout_threshold_msec={}, composer.toggle_cycle={}",
        s.composer.max_length,
        s.composer.timeout_threshold_msec,
        cycle.join(",")
    );
}

pub fn load_settings(file: &str) -> Settings {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(settings::parse_settings_toml(&content), "Error: {}")
}
