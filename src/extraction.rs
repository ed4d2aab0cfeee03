/*!
 * Extractor interface and the coordinator that folds extractor output into a
 * timeline.
 *
 * Extractors declare whether they work on a single text element or on a
 * whole collection. Collection-level extractors run once and return their own
 * events; element-level extractors run once per element and their value is
 * placed at that element's onset.
 */

use std::fmt::Debug;

use log::debug;
use serde_json::Value;

use crate::errors::ExtractionError;
use crate::stimuli::{TextCollection, TextElement};
use crate::timeline::{Event, Timeline};

/// What an extractor operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorTarget {
    /// One text element at a time
    Element,
    /// An entire collection, for features needing cross-element context
    Collection,
}

/// Input handed to an extractor
#[derive(Debug, Clone, Copy)]
pub enum StimulusUnit<'a> {
    Element(&'a TextElement),
    Collection(&'a TextCollection),
}

// @const: Expected output of an element-level extractor
pub(crate) const SINGLE_VALUE: &str = "a single value for a text element";

/// Output of an extractor
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractorOutput {
    /// A single value, for element-level extractors
    Value(Value),
    /// Ready-made events, for collection-level extractors
    Events(Vec<Event>),
}

/// Common trait for all feature extractors
///
/// Implementations are black boxes to this crate: only the name, the declared
/// target and the output shape matter.
pub trait Extractor: Debug {
    /// Name under which values are stored in events
    fn name(&self) -> &str;

    /// Declared unit of operation
    fn target(&self) -> ExtractorTarget;

    /// Run the extractor on one unit
    fn apply(&self, unit: StimulusUnit<'_>) -> anyhow::Result<ExtractorOutput>;
}

/// Drives a fixed list of borrowed extractors over stimuli
#[derive(Debug)]
pub struct ExtractionCoordinator<'a> {
    extractors: Vec<&'a dyn Extractor>,
    merge_events: bool,
}

impl<'a> ExtractionCoordinator<'a> {
    pub fn new(extractors: &[&'a dyn Extractor], merge_events: bool) -> Self {
        Self {
            extractors: extractors.to_vec(),
            merge_events,
        }
    }

    pub fn merge_events(&self) -> bool {
        self.merge_events
    }

    /// Run every extractor over the collection, in declaration order.
    pub fn extract(&self, collection: &TextCollection) -> Result<Timeline, ExtractionError> {
        let mut timeline = Timeline::new();

        for extractor in &self.extractors {
            match extractor.target() {
                ExtractorTarget::Collection => {
                    let events = match run(*extractor, StimulusUnit::Collection(collection))? {
                        ExtractorOutput::Events(events) => events,
                        ExtractorOutput::Value(_) => {
                            return Err(mismatch(*extractor, "events from a collection-level extractor"));
                        }
                    };
                    debug!("Extractor '{}' produced {} events", extractor.name(), events.len());
                    for event in events {
                        timeline.add_event(event, self.merge_events);
                    }
                }
                ExtractorTarget::Element => {
                    for element in collection {
                        let value = match run(*extractor, StimulusUnit::Element(element))? {
                            ExtractorOutput::Value(value) => value,
                            ExtractorOutput::Events(_) => {
                                return Err(mismatch(*extractor, SINGLE_VALUE));
                            }
                        };
                        let event = Event::new(element.onset()).with_value(extractor.name(), value);
                        timeline.add_event(event, self.merge_events);
                    }
                    debug!("Extractor '{}' applied to {} elements", extractor.name(), collection.len());
                }
            }
        }

        Ok(timeline)
    }

    /// Run the extractors on a single element; see `TextElement::extract`
    pub fn extract_element(&self, element: &TextElement) -> Result<Event, ExtractionError> {
        element.extract(&self.extractors)
    }
}

/// Apply one extractor, wrapping its failure with the extractor name
pub(crate) fn run(extractor: &dyn Extractor, unit: StimulusUnit<'_>) -> Result<ExtractorOutput, ExtractionError> {
    extractor.apply(unit).map_err(|e| ExtractionError::ExtractorFailed {
        extractor: extractor.name().to_string(),
        message: format!("{:#}", e),
    })
}

pub(crate) fn mismatch(extractor: &dyn Extractor, expected: &str) -> ExtractionError {
    ExtractionError::TargetMismatch {
        extractor: extractor.name().to_string(),
        expected: expected.to_string(),
    }
}

/// Apply `extractors` to `collection` and fold the results into a new timeline
pub fn extract(
    collection: &TextCollection,
    extractors: &[&dyn Extractor],
    merge_events: bool,
) -> Result<Timeline, ExtractionError> {
    ExtractionCoordinator::new(extractors, merge_events).extract(collection)
}
