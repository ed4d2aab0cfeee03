/*!
 * Tests for error types
 */

use std::error::Error;
use std::io;
use std::path::PathBuf;
use textstim::errors::{AppError, ExtractionError, ResourceError, StimulusError};

/// Test that parse errors name the line, column and value
#[test]
fn test_stimulusError_parse_shouldDescribeLocation() {
    let error = StimulusError::Parse {
        line: 7,
        column: "onset".to_string(),
        value: "abc".to_string(),
    };

    let message = error.to_string();

    assert!(message.contains("line 7"));
    assert!(message.contains("onset"));
    assert!(message.contains("abc"));
}

/// Test that I/O errors keep their source
#[test]
fn test_stimulusError_io_shouldExposeSource() {
    let error = StimulusError::Io {
        path: PathBuf::from("words.txt"),
        source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };

    assert!(error.to_string().contains("words.txt"));
    assert!(error.source().is_some());
}

/// Test that stimulus errors convert into application errors
#[test]
fn test_appError_fromStimulusError_shouldWrap() {
    let app_error: AppError = StimulusError::MissingColumn("text".to_string()).into();

    assert!(matches!(app_error, AppError::Stimulus(StimulusError::MissingColumn(_))));
    assert!(app_error.to_string().contains("Missing required column: text"));
}

/// Test that extraction errors convert into application errors
#[test]
fn test_appError_fromExtractionError_shouldWrap() {
    let app_error: AppError = ExtractionError::ExtractorFailed {
        extractor: "length".to_string(),
        message: "boom".to_string(),
    }
    .into();

    assert!(matches!(app_error, AppError::Extraction(_)));
    assert!(app_error.to_string().contains("length"));
}

/// Test conversions from anyhow and io errors
#[test]
fn test_appError_fromOtherErrors_shouldMapVariants() {
    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    let from_io: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();

    assert!(matches!(from_anyhow, AppError::Unknown(ref m) if m == "something odd"));
    assert!(matches!(from_io, AppError::File(_)));
}

/// Test that resource errors compare by value
#[test]
fn test_resourceError_shouldCompareByValue() {
    assert_eq!(
        ResourceError::NotInstalled("punkt".to_string()),
        ResourceError::NotInstalled("punkt".to_string())
    );
    assert_ne!(
        ResourceError::NotInstalled("punkt".to_string()),
        ResourceError::UnsupportedLanguage("punkt".to_string())
    );
}
