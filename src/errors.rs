/*!
 * Error types for the textstim library.
 *
 * This module contains custom error types for the different layers of the
 * crate, using the thiserror crate for ergonomic error definitions. The
 * application layer (CLI, controller, config) works with anyhow on top of these.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building text stimuli
#[derive(Error, Debug)]
pub enum StimulusError {
    /// The source file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A field of a delimited or SRT file could not be parsed
    #[error("Parse error at line {line}, column '{column}': invalid value '{value}'")]
    Parse {
        /// 1-based line number in the source
        line: usize,
        /// Column (or SRT field) name
        column: String,
        /// Offending raw value
        value: String,
    },

    /// The positional column specification is unusable
    #[error("Invalid column specification: {0}")]
    InvalidColumnSpec(String),

    /// A required column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Segmentation unit is not recognised
    #[error("Invalid unit '{0}': unit must be either 'word' or 'sentence'")]
    InvalidUnit(String),

    /// No tokenizer can handle the requested unit
    #[error("No tokenizer available for unit '{unit}' ({reason}); pass an explicit tokenizer or provide an NLP tokenizer resolver, otherwise unit must be 'word'")]
    TokenizerUnavailable {
        /// Requested unit
        unit: String,
        /// Why resolution failed
        reason: String,
    },

    /// A subtitle source contained no usable cue
    #[error("No valid subtitle cues found in {0}")]
    NoCues(String),

    /// A tokenizer pattern failed to compile
    #[error("Invalid tokenizer pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while resolving an NLP tokenizer resource
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// No tokenizer resource is installed
    #[error("Tokenizer resource not installed: {0}")]
    NotInstalled(String),

    /// The resource exists but does not cover the language
    #[error("Unsupported tokenizer language: {0}")]
    UnsupportedLanguage(String),
}

/// Errors that can occur while applying extractors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The extractor produced output that does not fit its declared target
    #[error("Extractor '{extractor}' does not fit here: expected {expected}")]
    TargetMismatch {
        /// Extractor name
        extractor: String,
        /// What the caller expected from it
        expected: String,
    },

    /// The extractor itself failed
    #[error("Extractor '{extractor}' failed: {message}")]
    ExtractorFailed {
        /// Extractor name
        extractor: String,
        /// Error message reported by the extractor
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while building stimuli
    #[error("Stimulus error: {0}")]
    Stimulus(#[from] StimulusError),

    /// Error while running extractors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
