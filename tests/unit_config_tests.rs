use std::fs;
use std::path::PathBuf;

use financer::categories::{CATEGORIES_KEY, DEFAULT_CATEGORIES};
use financer::config::Config;
use financer::error::FinancerError;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.store.key, CATEGORIES_KEY);
    assert_eq!(config.categories.defaults.len(), DEFAULT_CATEGORIES.len());
    assert_eq!(config.delimiter_byte().unwrap(), b',');
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("financer.toml");
    fs::write(
        &path,
        "[store]\npath = \"/tmp/cats.json\"\n\n[categories]\ndefaults = [\"Food\", \"Rent\"]\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.store_path(), PathBuf::from("/tmp/cats.json"));
    assert_eq!(config.store.key, CATEGORIES_KEY);
    assert_eq!(config.categories.defaults, ["Food", "Rent"]);
    assert_eq!(config.import.delimiter, ',');
}

#[test]
fn test_semicolon_delimiter() {
    let config = Config::parse("[import]\ndelimiter = \";\"\n").unwrap();
    assert_eq!(config.delimiter_byte().unwrap(), b';');
}

#[test]
fn test_non_ascii_delimiter_is_rejected() {
    let err = Config::parse("[import]\ndelimiter = \"§\"\n").unwrap_err();
    assert!(matches!(err, FinancerError::InvalidConfig(_)));
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(matches!(Config::parse("[store\n"), Err(FinancerError::Config(_))));
}

#[test]
fn test_default_store_path_is_under_home() {
    let path = Config::default().store_path();
    assert!(path.ends_with(".financer/store.json"));
}
