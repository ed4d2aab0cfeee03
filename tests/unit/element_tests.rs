/*!
 * Tests for text elements
 */

use anyhow::Result;
use serde_json::json;
use textstim::errors::{ExtractionError, StimulusError};
use textstim::extraction::Extractor;
use textstim::stimuli::TextElement;
use crate::common;
use crate::common::mock_extractors::{MockCollectionExtractor, MockElementExtractor, MisbehavingExtractor};

/// Test that from_path reads the whole file as one element
#[test]
fn test_fromPath_withExistingFile_shouldReadWholeText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "story.txt", "Once upon\na time.")?;

    let element = TextElement::from_path(&path)?;

    assert_eq!(element.text(), "Once upon\na time.");
    assert!(!element.is_dynamic());
    assert_eq!(element.onset(), None);
    Ok(())
}

/// Test that an unreadable path is reported with the path
#[test]
fn test_fromPath_withMissingFile_shouldReturnIoError() {
    let result = TextElement::from_path("definitely/not/here.txt");
    match result {
        Err(StimulusError::Io { path, .. }) => assert!(path.ends_with("here.txt")),
        other => panic!("expected Io error, got {:?}", other),
    }
}

/// Test that each element-level extractor value is stored under its own name
#[test]
fn test_extract_withTwoExtractors_shouldKeyValuesByExtractorName() -> Result<()> {
    let element = TextElement::dynamic("dog", 3, Some(2.0), Some(0.5));
    let frequency = MockElementExtractor::new("frequency", json!(120));
    let valence = MockElementExtractor::new("valence", json!(0.8));
    let extractors: Vec<&dyn Extractor> = vec![&frequency, &valence];

    let event = element.extract(&extractors)?;

    assert_eq!(event.onset(), Some(2.0));
    assert_eq!(event.get("frequency"), Some(&json!(120)));
    assert_eq!(event.get("valence"), Some(&json!(0.8)));
    assert_eq!(event.len(), 2);
    Ok(())
}

/// Test that a plain element yields an event without onset
#[test]
fn test_extract_withPlainElement_shouldUseNullOnset() -> Result<()> {
    let element = TextElement::new("cat");
    let extractor = MockElementExtractor::new("length", json!(3));

    let event = element.extract(&[&extractor])?;

    assert_eq!(event.onset(), None);
    assert_eq!(event.get("length"), Some(&json!(3)));
    Ok(())
}

/// Test that collection-level extractors are rejected on a single element
#[test]
fn test_extract_withCollectionExtractor_shouldFailWithTargetMismatch() {
    let element = TextElement::new("cat");
    let extractor = MockCollectionExtractor::new("summary", vec![None]);

    let result = element.extract(&[&extractor]);

    assert!(matches!(result, Err(ExtractionError::TargetMismatch { ref extractor, .. }) if extractor == "summary"));
    assert_eq!(extractor.calls.get(), 0);
}

/// Test that an element extractor returning events is rejected
#[test]
fn test_extract_withEventsOutput_shouldFailWithTargetMismatch() {
    let element = TextElement::new("cat");

    let result = element.extract(&[&MisbehavingExtractor]);

    assert!(matches!(result, Err(ExtractionError::TargetMismatch { .. })));
}
