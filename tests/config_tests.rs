use std::fs;
use std::path::Path;

use tempfile::TempDir;

use repopulse::error::{ConfigError, Error};
use repopulse::infrastructure::config::settings::Config;
use repopulse::testkit;

#[test]
fn rooted_config_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, testkit::config::toml_rooted_at(dir.path())).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.storage.ledger_path(),
        dir.path().join("data").join("outcomes.csv")
    );
    assert_eq!(
        config.storage.ledger_path(),
        testkit::config::rooted_at(dir.path()).storage.ledger_path()
    );
}

#[test]
fn missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.scoring.horizon_days, 7);
    assert_eq!(config.storage.predictions_path(), Path::new("./predictions"));
    config.validate().unwrap();
}

#[test]
fn missing_file_is_an_error_for_load() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn mismatched_horizons_are_rejected() {
    let toml = r#"
[model.coefficients]
horizon_days = 14

[scoring]
horizon_days = 7
"#;
    let err = Config::parse_toml(toml).unwrap_err();
    assert!(err.to_string().contains("scoring.horizon_days"));
}

#[test]
fn negative_band_is_rejected() {
    let err = Config::parse_toml("[model.coefficients]\nband_floor = -1.0\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "model.coefficients",
            ..
        })
    ));
}

#[test]
fn unknown_logging_format_is_rejected() {
    let err = Config::parse_toml("[logging]\nformat = \"yaml\"\n").unwrap_err();
    assert!(err.to_string().contains("logging.format"));
}
