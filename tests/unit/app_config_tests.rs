/*!
 * Tests for configuration loading and validation
 */

use subkit::Config;
use crate::common;

#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.chunk_size, 50);
    assert_eq!(config.provider.model, "gpt-4");
}

#[test]
fn test_config_roundTrip_shouldPreserveValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.translation.chunk_size = 25;
    config.provider.model = "gpt-4o-mini".to_string();
    config.write_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.translation.chunk_size, 25);
    assert_eq!(loaded.provider.model, "gpt-4o-mini");
}

/// Missing fields fall back to defaults
#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "target_language": "es" }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.chunk_size, 50);
    assert_eq!(config.translation.max_retries, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withZeroChunkSize_shouldFail() {
    let mut config = Config::default();
    config.translation.chunk_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyTargetLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_from_file_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::from_file(&path).is_err());
}
