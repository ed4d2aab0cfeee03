use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::IngestionConfig;
use crate::errors::{ExtractionError, StimulusError};
use crate::extraction::{self, Extractor};
use crate::stimuli::element::TextElement;
use crate::stimuli::tokenizer::{self, OfflineResolver, Tokenizer, TokenizerResolver};
use crate::timeline::Timeline;

// @module: Ordered collections of text stimuli

// @const: SRT cue timing line
static SRT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: Header names that mark the first line of a delimited file as a header
const RESERVED_COLUMNS: [&str; 3] = ["text", "onset", "duration"];

/// Column role in a delimited collection file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Text,
    Onset,
    Duration,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "onset" => Some(Self::Onset),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }

    fn from_spec_char(c: char) -> Option<Self> {
        match c {
            't' => Some(Self::Text),
            'o' => Some(Self::Onset),
            'd' => Some(Self::Duration),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Onset => "onset",
            Self::Duration => "duration",
        }
    }
}

/// Where each role lives in a row
#[derive(Debug, Default)]
struct ColumnLayout {
    text: Option<usize>,
    onset: Option<usize>,
    duration: Option<usize>,
}

impl ColumnLayout {
    fn assign(&mut self, column: Column, index: usize) {
        let slot = match column {
            Column::Text => &mut self.text,
            Column::Onset => &mut self.onset,
            Column::Duration => &mut self.duration,
        };
        // First occurrence wins on duplicated headers
        if slot.is_none() {
            *slot = Some(index);
        }
    }

    fn from_header(fields: &[&str]) -> Result<Self, StimulusError> {
        let mut layout = Self::default();
        for (index, field) in fields.iter().enumerate() {
            if let Some(column) = Column::from_header(field.trim()) {
                layout.assign(column, index);
            }
        }
        if layout.text.is_none() {
            return Err(StimulusError::MissingColumn(Column::Text.name().to_string()));
        }
        Ok(layout)
    }

    fn from_spec(spec: &str) -> Result<Self, StimulusError> {
        let mut layout = Self::default();
        let mut seen = Vec::with_capacity(3);
        for (index, c) in spec.chars().enumerate() {
            let column = Column::from_spec_char(c).ok_or_else(|| {
                StimulusError::InvalidColumnSpec(format!(
                    "'{}' contains '{}'; only 't', 'o' and 'd' are allowed",
                    spec, c
                ))
            })?;
            if seen.contains(&column) {
                return Err(StimulusError::InvalidColumnSpec(format!(
                    "'{}' names the {} column more than once",
                    spec,
                    column.name()
                )));
            }
            seen.push(column);
            layout.assign(column, index);
        }
        if layout.text.is_none() {
            return Err(StimulusError::InvalidColumnSpec(format!(
                "'{}' has no text column",
                spec
            )));
        }
        Ok(layout)
    }
}

/// Validate a positional column specification such as "tod" or "ot"
pub fn validate_column_spec(spec: &str) -> Result<(), StimulusError> {
    ColumnLayout::from_spec(spec).map(|_| ())
}

fn parse_seconds(raw: &str, line: usize, column: Column) -> Result<Option<f64>, StimulusError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(StimulusError::Parse {
            line,
            column: column.name().to_string(),
            value: raw.to_string(),
        }),
    }
}

/// One parsed SRT cue, times in milliseconds
#[derive(Debug)]
struct SrtCue {
    start_ms: u64,
    end_ms: u64,
    text: String,
}

fn timing_to_ms(caps: &regex::Captures, first_group: usize) -> Option<u64> {
    let part = |offset: usize| caps.get(first_group + offset)?.as_str().parse::<u64>().ok();
    let (hours, minutes, seconds, millis) = (part(0)?, part(1)?, part(2)?, part(3)?);
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

fn parse_srt_cues(content: &str) -> Vec<SrtCue> {
    let mut cues = Vec::new();
    let mut timing: Option<(u64, u64)> = None;
    let mut lines_of_text: Vec<&str> = Vec::new();
    let mut awaiting_timing = false;
    let mut skipping = false;

    let mut finish = |timing: Option<(u64, u64)>, lines_of_text: &mut Vec<&str>, line_no: usize| {
        if let Some((start_ms, end_ms)) = timing {
            let text = lines_of_text.join(" ");
            if text.trim().is_empty() {
                warn!("Skipping empty subtitle cue ending at line {}", line_no);
            } else if end_ms < start_ms {
                warn!("Skipping subtitle cue ending at line {}: end precedes start", line_no);
            } else {
                cues.push(SrtCue { start_ms, end_ms, text: text.trim().to_string() });
            }
        }
        lines_of_text.clear();
    };

    let mut line_no = 0;
    for raw in content.lines() {
        line_no += 1;
        let line = raw.trim().trim_start_matches('\u{feff}');

        if line.is_empty() {
            finish(timing.take(), &mut lines_of_text, line_no);
            awaiting_timing = false;
            skipping = false;
            continue;
        }
        if skipping {
            continue;
        }
        if timing.is_some() {
            lines_of_text.push(line);
            continue;
        }
        if let Some(caps) = SRT_TIMING_REGEX.captures(line) {
            match (timing_to_ms(&caps, 1), timing_to_ms(&caps, 5)) {
                (Some(start), Some(end)) => timing = Some((start, end)),
                _ => {
                    warn!("Invalid cue timing at line {}: {}", line_no, line);
                    skipping = true;
                }
            }
            awaiting_timing = false;
            continue;
        }
        if !awaiting_timing && line.parse::<usize>().is_ok() {
            awaiting_timing = true;
            continue;
        }
        warn!("Unexpected text at line {} outside a subtitle cue: {}", line_no, line);
        skipping = true;
    }
    finish(timing.take(), &mut lines_of_text, line_no);

    cues
}

/// Ordered sequence of text elements, e.g. the words of a story with their onsets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCollection {
    elements: Vec<TextElement>,
}

impl TextCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from already-built elements, keeping their order
    pub fn from_elements(elements: Vec<TextElement>) -> Self {
        Self { elements }
    }

    /// Load a tab-delimited file.
    ///
    /// When the first line names any of `text`, `onset` or `duration` it is
    /// taken as a header and `column_spec` is ignored. Otherwise each
    /// character of `column_spec` (`t`, `o`, `d`) names the file column at the
    /// same position. Rows without an explicit duration get `default_duration`.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        column_spec: &str,
        default_duration: Option<f64>,
    ) -> Result<Self, StimulusError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StimulusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collection = Self::from_delimited_str(&content, column_spec, default_duration)?;
        debug!("Loaded {} elements from {}", collection.len(), path.display());
        Ok(collection)
    }

    /// Parse tab-delimited content; see `from_file`
    pub fn from_delimited_str(
        content: &str,
        column_spec: &str,
        default_duration: Option<f64>,
    ) -> Result<Self, StimulusError> {
        let mut lines = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .enumerate()
            .map(|(i, line)| (i + 1, line));

        let Some((_, first_line)) = lines.clone().next() else {
            return Ok(Self::new());
        };

        // Fields are trimmed one by one; a leading empty field (unnamed index column) keeps its slot
        let first_fields: Vec<&str> = first_line.split('\t').collect();
        let has_header = first_fields.iter().any(|f| RESERVED_COLUMNS.contains(&f.trim()));
        let layout = if has_header {
            lines.next();
            ColumnLayout::from_header(&first_fields)?
        } else {
            ColumnLayout::from_spec(column_spec)?
        };

        let field = |fields: &[&str], index: Option<usize>| -> Option<String> {
            index.map(|i| fields.get(i).copied().unwrap_or("").to_string())
        };

        let mut elements = Vec::new();
        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let text = field(&fields, layout.text).unwrap_or_default();

            let element = match field(&fields, layout.onset) {
                None => TextElement::new(text),
                Some(raw_onset) => {
                    let onset = parse_seconds(&raw_onset, line_no, Column::Onset)?;
                    let duration = match field(&fields, layout.duration) {
                        Some(raw) => parse_seconds(&raw, line_no, Column::Duration)?,
                        None => None,
                    }
                    .or(default_duration);
                    TextElement::dynamic(text, elements.len(), onset, duration)
                }
            };
            elements.push(element);
        }

        Ok(Self { elements })
    }

    /// Load an SRT subtitle file, one timed element per cue.
    /// `onset_offset` (seconds) is added to every cue start.
    pub fn from_srt<P: AsRef<Path>>(path: P, onset_offset: f64) -> Result<Self, StimulusError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StimulusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_srt_str(&content, onset_offset).map_err(|e| match e {
            StimulusError::NoCues(_) => StimulusError::NoCues(path.display().to_string()),
            other => other,
        })
    }

    /// Parse SRT content; see `from_srt`
    pub fn from_srt_str(content: &str, onset_offset: f64) -> Result<Self, StimulusError> {
        let mut cues = parse_srt_cues(content);
        if cues.is_empty() {
            return Err(StimulusError::NoCues("subtitle content".to_string()));
        }
        cues.sort_by_key(|cue| cue.start_ms);

        let elements = cues
            .into_iter()
            .enumerate()
            .map(|(order, cue)| {
                let onset = (cue.start_ms as f64 / 1000.0 + onset_offset).max(0.0);
                let duration = (cue.end_ms - cue.start_ms) as f64 / 1000.0;
                TextElement::dynamic(cue.text, order, Some(onset), Some(duration))
            })
            .collect();

        Ok(Self { elements })
    }

    /// Load a file according to its extension: `.srt` as subtitles,
    /// anything else as tab-delimited text
    pub fn open<P: AsRef<Path>>(path: P, config: &IngestionConfig) -> Result<Self, StimulusError> {
        let path = path.as_ref();
        let is_srt = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("srt"));
        if is_srt {
            Self::from_srt(path, config.srt_onset_offset)
        } else {
            Self::from_file(path, &config.columns, config.default_duration)
        }
    }

    /// Segment raw text into word or sentence elements.
    ///
    /// No NLP tokenizer is consulted: words use the built-in fallback
    /// tokenizer and sentences require an explicit tokenizer.
    pub fn from_text(
        text: &str,
        unit: &str,
        tokenizer: Option<&Tokenizer>,
        language: &str,
    ) -> Result<Self, StimulusError> {
        Self::from_text_with_resolver(text, unit, tokenizer, language, &OfflineResolver)
    }

    /// Segment raw text, asking `resolver` for an NLP tokenizer when no
    /// explicit tokenizer is given
    pub fn from_text_with_resolver(
        text: &str,
        unit: &str,
        tokenizer: Option<&Tokenizer>,
        language: &str,
        resolver: &dyn TokenizerResolver,
    ) -> Result<Self, StimulusError> {
        let tokens = tokenizer::segment(text, unit, tokenizer, language, resolver)?;
        Ok(tokens.into_iter().map(TextElement::new).collect())
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&TextElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, TextElement> {
        self.elements.iter()
    }

    /// Text of every element, in order
    pub fn texts(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.text()).collect()
    }

    /// Run extractors over this collection; see `extraction::extract`
    pub fn extract(&self, extractors: &[&dyn Extractor], merge_events: bool) -> Result<Timeline, ExtractionError> {
        extraction::extract(self, extractors, merge_events)
    }
}

impl FromIterator<TextElement> for TextCollection {
    fn from_iter<I: IntoIterator<Item = TextElement>>(iter: I) -> Self {
        Self { elements: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a TextCollection {
    type Item = &'a TextElement;
    type IntoIter = std::slice::Iter<'a, TextElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for TextCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Text Collection")?;
        writeln!(f, "Elements: {}", self.elements.len())?;
        for element in &self.elements {
            writeln!(f, "  {}", element)?;
        }
        Ok(())
    }
}
