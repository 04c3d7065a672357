use smartmark::config::{
    QuoteSettings, cli_overlay, load_config, load_layered, merge, save_config,
};
use smartmark::quotes::{QuotePair, SmartQuotes};

#[test]
fn test_legacy_flag_in_file_disables_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "useSmartQuotes": false }"#).unwrap();

    let settings = QuoteSettings::resolve(&load_config(&path).unwrap());
    assert!(!settings.enabled);
    assert!(SmartQuotes::from_settings(&settings).rules().is_empty());
}

#[test]
fn test_local_file_overrides_single_glyph() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("global.json");
    let local = dir.path().join(".smartmark.json");
    std::fs::write(
        &global,
        r#"{ "smartQuotes": { "single": { "left": "‹", "right": "›" } } }"#,
    )
    .unwrap();
    std::fs::write(&local, r#"{ "smartQuotes": { "single": { "left": "<" } } }"#).unwrap();

    let settings = QuoteSettings::resolve(&load_layered(&global, &local).unwrap());
    assert_eq!(settings.single, QuotePair::new("<", "›"));
    assert_eq!(settings.double, QuotePair::double());

    let quotes = SmartQuotes::from_settings(&settings);
    let rule = quotes.rule_for('\'').unwrap();
    assert_eq!(rule.pair().left, "<");
}

#[test]
fn test_cli_flag_overrides_enabled_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "smartQuotes": { "enabled": true } }"#).unwrap();

    let mut config = load_config(&path).unwrap();
    merge(&mut config, cli_overlay(true));
    assert!(!QuoteSettings::resolve(&config).enabled);
}

#[test]
fn test_missing_files_mean_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_layered(&dir.path().join("a.json"), &dir.path().join("b.json")).unwrap();
    assert_eq!(QuoteSettings::resolve(&config), QuoteSettings::default());
}

#[test]
fn test_saved_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let settings = QuoteSettings {
        double: QuotePair::new("„", "“"),
        ..QuoteSettings::default()
    };
    save_config(&path, &settings.to_value()).unwrap();

    let loaded = QuoteSettings::resolve(&load_config(&path).unwrap());
    assert_eq!(loaded, settings);
}
