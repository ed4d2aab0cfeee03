/*!
 * Built-in reference extractors.
 *
 * Real feature extractors live outside this crate; these two exist so the
 * command line tool has something to run out of the box.
 */

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::extraction::{Extractor, ExtractorOutput, ExtractorTarget, StimulusUnit};
use crate::stimuli::fallback_word_tokenize;
use crate::timeline::Event;

/// Number of characters in each element
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthExtractor;

impl Extractor for LengthExtractor {
    fn name(&self) -> &str {
        "length"
    }

    fn target(&self) -> ExtractorTarget {
        ExtractorTarget::Element
    }

    fn apply(&self, unit: StimulusUnit<'_>) -> Result<ExtractorOutput> {
        match unit {
            StimulusUnit::Element(element) => Ok(ExtractorOutput::Value(json!(element.text().chars().count()))),
            StimulusUnit::Collection(_) => Err(anyhow!("length operates on single text elements")),
        }
    }
}

/// Number of distinct case-folded words across a whole collection,
/// reported at the onset of the first element
#[derive(Debug, Clone, Copy, Default)]
pub struct NumUniqueWordsExtractor;

impl Extractor for NumUniqueWordsExtractor {
    fn name(&self) -> &str {
        "num_unique_words"
    }

    fn target(&self) -> ExtractorTarget {
        ExtractorTarget::Collection
    }

    fn apply(&self, unit: StimulusUnit<'_>) -> Result<ExtractorOutput> {
        let StimulusUnit::Collection(collection) = unit else {
            return Err(anyhow!("num_unique_words needs a whole text collection"));
        };

        let words: HashSet<String> = collection
            .iter()
            .flat_map(|element| fallback_word_tokenize(element.text()))
            .map(|word| word.to_lowercase())
            .collect();

        let onset = collection.get(0).and_then(|element| element.onset());
        let event = Event::new(onset).with_value(self.name(), json!(words.len()));
        Ok(ExtractorOutput::Events(vec![event]))
    }
}

/// Names accepted by `builtin`
pub fn builtin_names() -> &'static [&'static str] {
    &["length", "num_unique_words"]
}

/// Look up a built-in extractor by name
pub fn builtin(name: &str) -> Option<Box<dyn Extractor>> {
    match name {
        "length" => Some(Box::new(LengthExtractor)),
        "num_unique_words" => Some(Box::new(NumUniqueWordsExtractor)),
        _ => None,
    }
}
