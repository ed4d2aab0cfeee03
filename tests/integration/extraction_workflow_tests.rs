/*!
 * End-to-end tests for the extraction workflow
 */

use anyhow::Result;
use serde_json::{Value, json};
use textstim::app_config::Config;
use textstim::app_controller::Controller;
use crate::common;

fn read_json(path: &std::path::Path) -> Result<Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

/// Test the controller initialization with default config
#[test]
fn test_controller_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.extractors()?.len(), 1);
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.extraction.extractors = vec!["nope".to_string()];

    assert!(Controller::with_config(config).is_err());
}

/// Test a full run over a word list writing a JSON table
#[test]
fn test_run_withWordList_shouldWriteTimelineTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_word_list(&dir, "words.txt")?;
    let output = dir.join("words.json");

    let mut config = Config::default();
    config.extraction.extractors = vec!["length".to_string(), "num_unique_words".to_string()];
    let controller = Controller::with_config(config)?;

    controller.run(input, Some(output.clone()), false)?;

    let table = read_json(&output)?;
    assert_eq!(table["columns"], json!(["onset", "length", "num_unique_words"]));
    assert_eq!(
        table["rows"],
        json!([
            [0.0, 3, 4],
            [0.3, 5, null],
            [0.7, 5, null],
            [1.1, 3, null]
        ])
    );
    Ok(())
}

/// Test that existing outputs are kept unless forced
#[test]
fn test_run_withExistingOutput_shouldRespectForceFlag() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_subtitle(&dir, "movie.srt")?;
    let output = common::create_test_file(&dir, "movie.json", "untouched")?;
    let controller = Controller::with_config(Config::default())?;

    controller.run(input.clone(), Some(output.clone()), false)?;
    assert_eq!(std::fs::read_to_string(&output)?, "untouched");

    controller.run(input, Some(output.clone()), true)?;
    let table = read_json(&output)?;
    assert_eq!(table["rows"][0], json!([1.0, 24]));
    Ok(())
}

/// Test that separate events are kept when merging is disabled
#[test]
fn test_processFile_withMergeDisabled_shouldKeepEventPerExtractor() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_word_list(&temp_dir.path().to_path_buf(), "words.tsv")?;

    let mut config = Config::default();
    config.extraction.merge_events = false;
    config.extraction.extractors = vec!["length".to_string(), "num_unique_words".to_string()];
    let controller = Controller::with_config(config)?;

    let table = controller.process_file(&input)?;

    assert_eq!(table.rows.len(), 5);
    Ok(())
}

/// Test directory processing with a broken file among good ones
#[test]
fn test_runFolder_withMixedFiles_shouldProcessValidOnes() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("stimuli");
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir_all(&input_dir)?;

    common::create_test_word_list(&input_dir, "words.txt")?;
    common::create_test_subtitle(&input_dir, "movie.srt")?;
    common::create_test_file(&input_dir, "broken.tsv", "a\tnot-a-number\n")?;

    let controller = Controller::with_config(Config::default())?;
    let count = controller.run_folder(input_dir, Some(output_dir.clone()), false)?;

    assert_eq!(count, 2);
    assert!(output_dir.join("words.txt.events.json").exists());
    assert!(output_dir.join("movie.srt.events.json").exists());
    assert!(!output_dir.join("broken.tsv.events.json").exists());
    Ok(())
}

/// Test that files sharing a stem are both processed
#[test]
fn test_runFolder_withSameStemDifferentFormats_shouldWriteBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("stimuli");
    std::fs::create_dir_all(&input_dir)?;

    common::create_test_word_list(&input_dir, "story.tsv")?;
    common::create_test_subtitle(&input_dir, "story.srt")?;

    let controller = Controller::with_config(Config::default())?;
    let count = controller.run_folder(input_dir.clone(), None, false)?;

    assert_eq!(count, 2);
    assert_eq!(read_json(&input_dir.join("story.tsv.events.json"))?["rows"].as_array().map(|r| r.len()), Some(4));
    assert_eq!(read_json(&input_dir.join("story.srt.events.json"))?["rows"].as_array().map(|r| r.len()), Some(3));
    Ok(())
}

/// Test segmentation through the controller
#[test]
fn test_segmentText_withRuleTokenizer_shouldSplitSentences() -> Result<()> {
    let mut config = Config::default();
    config.segmentation.unit = "sentence".to_string();
    config.segmentation.use_rule_tokenizer = true;
    let controller = Controller::with_config(config)?;

    let collection = controller.segment_text("It rained. We stayed in.")?;

    assert_eq!(collection.texts(), vec!["It rained.", "We stayed in."]);
    Ok(())
}

/// Test that sentence segmentation without an NLP tokenizer fails
#[test]
fn test_segmentText_withSentenceUnitOffline_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.segmentation.unit = "sentence".to_string();
    let controller = Controller::with_config(config)?;

    assert!(controller.segment_text("It rained. We stayed in.").is_err());
    Ok(())
}

/// Test that a configured pattern drives segmentation
#[test]
fn test_segmentText_withPattern_shouldUsePattern() -> Result<()> {
    let mut config = Config::default();
    config.segmentation.pattern = Some(r"[a-z]+".to_string());
    let controller = Controller::with_config(config)?;

    let collection = controller.segment_text("abc 123 def")?;

    assert_eq!(collection.texts(), vec!["abc", "def"]);
    Ok(())
}
