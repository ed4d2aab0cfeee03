use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::extractors;
use crate::language_utils;
use crate::stimuli::{SegmentUnit, validate_column_spec};

/// Application configuration module
/// This module handles loading, validating and saving the settings used to
/// build text collections and run extractors over them.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// How collection files are read
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// How raw text is segmented
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Which extractors run and how their events combine
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for reading collection files
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngestionConfig {
    // @field: Positional column spec for header-less delimited files
    #[serde(default = "default_columns")]
    pub columns: String,

    // @field: Duration given to rows without one
    #[serde(default)]
    pub default_duration: Option<f64>,

    // @field: Seconds added to every SRT cue onset, may be negative
    #[serde(default)]
    pub srt_onset_offset: f64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            default_duration: None,
            srt_onset_offset: 0.0,
        }
    }
}

/// Settings for segmenting raw text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    // @field: "word" or "sentence"
    #[serde(default = "default_unit")]
    pub unit: String,

    // @field: Tokenizer language, by English name or ISO code
    #[serde(default = "default_language")]
    pub language: String,

    // @field: Optional regex overriding unit-based segmentation
    #[serde(default)]
    pub pattern: Option<String>,

    // @field: Use the built-in rule-based NLP tokenizer
    #[serde(default)]
    pub use_rule_tokenizer: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            language: default_language(),
            pattern: None,
            use_rule_tokenizer: false,
        }
    }
}

/// Settings for running extractors
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    // @field: Fold events sharing an onset into one
    #[serde(default = "default_true")]
    pub merge_events: bool,

    // @field: Built-in extractor names, in run order
    #[serde(default = "default_extractors")]
    pub extractors: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            merge_events: true,
            extractors: default_extractors(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_columns() -> String {
    "tod".to_string()
}

fn default_unit() -> String {
    "word".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

fn default_true() -> bool {
    true
}

fn default_extractors() -> Vec<String> {
    vec!["length".to_string()]
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_column_spec(&self.ingestion.columns)?;

        if let Some(duration) = self.ingestion.default_duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(anyhow!("Default duration must be a non-negative number, got {}", duration));
            }
        }
        // Negative offsets shift cues earlier; onsets are clamped at zero on load
        if !self.ingestion.srt_onset_offset.is_finite() {
            return Err(anyhow!(
                "SRT onset offset must be a finite number, got {}",
                self.ingestion.srt_onset_offset
            ));
        }

        // A pattern overrides the unit, so the unit only matters without one
        if self.segmentation.pattern.is_none() {
            self.segmentation.unit.parse::<SegmentUnit>()?;
        }
        language_utils::get_language_name(&self.segmentation.language)
            .with_context(|| format!("Invalid tokenizer language: {}", self.segmentation.language))?;

        if self.extraction.extractors.is_empty() {
            return Err(anyhow!("At least one extractor must be configured"));
        }
        for name in &self.extraction.extractors {
            if extractors::builtin(name).is_none() {
                return Err(anyhow!(
                    "Unknown extractor '{}'; available: {}",
                    name,
                    extractors::builtin_names().join(", ")
                ));
            }
        }

        Ok(())
    }
}
