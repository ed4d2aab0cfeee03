/*!
 * Events and timelines of extraction results.
 *
 * An `Event` groups the values produced by one or more extractors at a single
 * onset. A `Timeline` is the ordered list of events produced by one
 * extraction run. With merging enabled a timeline holds at most one event per
 * onset, and events landing on an existing onset are folded into it.
 */

use std::cmp::Ordering;

use log::debug;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Values extracted at one point of the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    onset: Option<f64>,
    values: Vec<(String, Value)>,
}

fn onsets_match(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

impl Event {
    /// Create an event without values
    pub fn new(onset: Option<f64>) -> Self {
        Self {
            onset,
            values: Vec::new(),
        }
    }

    /// Builder-style `add_value`
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.add_value(name, value);
        self
    }

    pub fn onset(&self) -> Option<f64> {
        self.onset
    }

    /// Values in insertion order
    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Look up the value stored under an extractor name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store a value under `name`, replacing any previous value for that name
    /// in place
    pub fn add_value(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name, value)),
        }
    }

    fn absorb(&mut self, other: Event) {
        for (name, value) in other.values {
            self.add_value(name, value);
        }
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Values<'a>(&'a [(String, Value)]);

        impl Serialize for Values<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, value) in self.0 {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("Event", 2)?;
        state.serialize_field("onset", &self.onset)?;
        state.serialize_field("values", &Values(&self.values))?;
        state.end()
    }
}

/// Ordered collection of events produced by an extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    events: Vec<Event>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event.
    ///
    /// Without `merge` the event is appended. With `merge` it is folded into
    /// the existing event at the same onset (a missing onset only matches a
    /// missing onset), its values overwriting colliding names; if no such
    /// event exists it is appended.
    pub fn add_event(&mut self, event: Event, merge: bool) {
        if merge {
            if let Some(existing) = self
                .events
                .iter_mut()
                .find(|existing| onsets_match(existing.onset, event.onset))
            {
                existing.absorb(event);
                return;
            }
        }
        self.events.push(event);
    }

    /// Fold every event of `other` into this timeline, in order.
    ///
    /// Combining shards this way only gives the same result regardless of
    /// shard order when the shards never write the same name at the same onset.
    pub fn extend_from(&mut self, other: Timeline, merge: bool) {
        debug!("Folding {} events into timeline of {}", other.len(), self.len());
        for event in other.events {
            self.add_event(event, merge);
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// First event at the given onset
    pub fn find(&self, onset: Option<f64>) -> Option<&Event> {
        self.events.iter().find(|event| onsets_match(event.onset, onset))
    }

    /// Tabular view: an `onset` column followed by one column per extractor
    /// name (first-seen order), one row per event. Rows are sorted by onset,
    /// events without onset last; ties keep timeline order.
    pub fn to_table(&self) -> TimelineTable {
        let mut columns: Vec<String> = vec![ONSET_COLUMN.to_string()];
        for event in &self.events {
            for (name, _) in &event.values {
                if !columns.iter().skip(1).any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }

        let mut ordered: Vec<&Event> = self.events.iter().collect();
        ordered.sort_by(|a, b| match (a.onset, b.onset) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let rows = ordered
            .into_iter()
            .map(|event| {
                let mut row = Vec::with_capacity(columns.len());
                row.push(event.onset.map_or(Value::Null, Value::from));
                for name in columns.iter().skip(1) {
                    row.push(event.get(name).cloned().unwrap_or(Value::Null));
                }
                row
            })
            .collect();

        TimelineTable { columns, rows }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// @const: Name of the leading table column
pub const ONSET_COLUMN: &str = "onset";

/// Row/column view of a timeline; missing values are `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TimelineTable {
    /// All cells of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}
