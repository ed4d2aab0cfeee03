/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use textstim::app_config::{Config, LogLevel};
use crate::common;

/// Test that the default configuration is valid
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert_eq!(config.ingestion.columns, "tod");
    assert_eq!(config.ingestion.default_duration, None);
    assert_eq!(config.segmentation.language, "english");
    assert_eq!(config.extraction.extractors, vec!["length"]);
    assert!(config.validate().is_ok());
}

/// Test that saving and loading keeps every setting
#[test]
fn test_saveAndLoad_withCustomValues_shouldPreserveSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.ingestion.columns = "ot".to_string();
    config.ingestion.default_duration = Some(1.5);
    config.segmentation.unit = "sentence".to_string();
    config.segmentation.use_rule_tokenizer = true;
    config.extraction.merge_events = false;
    config.extraction.extractors = vec!["num_unique_words".to_string(), "length".to_string()];
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load(&path)?;

    assert_eq!(loaded.ingestion, config.ingestion);
    assert_eq!(loaded.segmentation, config.segmentation);
    assert_eq!(loaded.extraction, config.extraction);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"extraction": {"merge_events": false}, "log_level": "warn"}"#,
    )?;

    let config = Config::load(&path)?;

    assert!(!config.extraction.merge_events);
    assert_eq!(config.extraction.extractors, vec!["length"]);
    assert_eq!(config.ingestion.columns, "tod");
    assert_eq!(config.log_level, LogLevel::Warn);
    Ok(())
}

/// Test that malformed JSON is reported
#[test]
fn test_load_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "conf.json", "{ not json")?;

    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test that a bad column spec fails validation
#[test]
fn test_validate_withBadColumnSpec_shouldFail() {
    let mut config = Config::default();
    config.ingestion.columns = "xyz".to_string();
    assert!(config.validate().is_err());
}

/// Test that a bad unit fails validation unless a pattern overrides it
#[test]
fn test_validate_withBadUnit_shouldFailWithoutPattern() {
    let mut config = Config::default();
    config.segmentation.unit = "syllable".to_string();
    assert!(config.validate().is_err());

    config.segmentation.pattern = Some(r"\w+".to_string());
    assert!(config.validate().is_ok());
}

/// Test that unknown extractors fail validation
#[test]
fn test_validate_withUnknownExtractor_shouldFail() {
    let mut config = Config::default();
    config.extraction.extractors = vec!["sentiment".to_string()];

    let error = config.validate().unwrap_err();

    assert!(error.to_string().contains("sentiment"));
}

/// Test that an empty extractor list fails validation
#[test]
fn test_validate_withNoExtractors_shouldFail() {
    let mut config = Config::default();
    config.extraction.extractors.clear();
    assert!(config.validate().is_err());
}

/// Test that negative durations fail validation
#[test]
fn test_validate_withNegativeDuration_shouldFail() {
    let mut config = Config::default();
    config.ingestion.default_duration = Some(-0.5);
    assert!(config.validate().is_err());
}

/// Test that SRT offsets may be negative but must be finite
#[test]
fn test_validate_withSrtOffsets_shouldAcceptAnyFiniteValue() {
    let mut config = Config::default();
    config.ingestion.srt_onset_offset = -1.5;
    assert!(config.validate().is_ok());

    config.ingestion.srt_onset_offset = f64::NAN;
    assert!(config.validate().is_err());
}

/// Test that unknown languages fail validation
#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = Config::default();
    config.segmentation.language = "elvish".to_string();
    assert!(config.validate().is_err());
}
