use std::fmt;
use std::fs;
use std::path::Path;
use serde::Serialize;

use crate::errors::{ExtractionError, StimulusError};
use crate::extraction::{self, Extractor, ExtractorOutput, ExtractorTarget, StimulusUnit};
use crate::timeline::Event;

// @module: Atomic text stimulus

/// A single unit of text, optionally carrying timing information.
///
/// Plain elements only hold text. Dynamic elements belong to a timed
/// collection and additionally know their position in it, their onset and
/// their duration (both in seconds).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    onset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

impl TextElement {
    /// Create a plain element with no timing
    pub fn new(text: impl Into<String>) -> Self {
        TextElement {
            text: text.into(),
            order: None,
            onset: None,
            duration: None,
        }
    }

    /// Create a timed element for use inside a dynamic collection
    pub fn dynamic(text: impl Into<String>, order: usize, onset: Option<f64>, duration: Option<f64>) -> Self {
        TextElement {
            text: text.into(),
            order: Some(order),
            onset,
            duration,
        }
    }

    /// Create a plain element from the full contents of a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StimulusError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| StimulusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn order(&self) -> Option<usize> {
        self.order
    }

    pub fn onset(&self) -> Option<f64> {
        self.onset
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Whether this element carries timeline information
    pub fn is_dynamic(&self) -> bool {
        self.order.is_some()
    }

    /// Apply element-level extractors to this element alone.
    ///
    /// The result is one event at this element's onset with one value per
    /// extractor, each stored under that extractor's own name.
    pub fn extract(&self, extractors: &[&dyn Extractor]) -> Result<Event, ExtractionError> {
        let mut event = Event::new(self.onset);

        for extractor in extractors {
            if extractor.target() != ExtractorTarget::Element {
                return Err(extraction::mismatch(*extractor, "an element-level extractor"));
            }

            match extraction::run(*extractor, StimulusUnit::Element(self))? {
                ExtractorOutput::Value(value) => event.add_value(extractor.name(), value),
                ExtractorOutput::Events(_) => {
                    return Err(extraction::mismatch(*extractor, extraction::SINGLE_VALUE));
                }
            }
        }

        Ok(event)
    }
}

impl fmt::Display for TextElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.order, self.onset) {
            (Some(order), Some(onset)) => write!(f, "[{} @ {:.3}s] {}", order, onset, self.text),
            (Some(order), None) => write!(f, "[{}] {}", order, self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}
