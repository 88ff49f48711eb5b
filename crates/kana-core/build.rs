fn main() {
    // Validate embedded TOML files at compile time.
    for path in [
        "src/default_settings.toml",
        "src/table/default_romaji.toml",
        "src/table/twelve_key.toml",
    ] {
        println!("cargo:rerun-if-changed={path}");
    }
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml(
        "src/table/default_romaji.toml",
        include_str!("src/table/default_romaji.toml"),
    );
    validate_toml(
        "src/table/twelve_key.toml",
        include_str!("src/table/twelve_key.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    let value: toml::Value = match content.parse() {
        Ok(v) => v,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    };
    if path.contains("/table/") && value.get("mappings").is_none() && value.get("toggles").is_none() {
        panic!("{path} has neither [mappings] nor [toggles]");
    }
}
