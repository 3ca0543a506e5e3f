//! Event extraction
//!
//! Walks a score and turns every note, rest and chord into an `Event`,
//! grouped per partition and per measure. Elements of any other kind are
//! dropped without error.

pub mod event;
pub mod table;

pub use event::{format_duration, Event, REST_MARKER};
pub use table::{simplify_column_name, CorpusTable, STATIC_COLUMNS};

use crate::score::{quarter_length_to_f64, Chord, Element, Measure, Note, Part, Rest, Score};

/// Events of one partition (voice), one list per measure
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionEvents {
    pub name: String,
    pub measures: Vec<Vec<Event>>,
}

/// Extract the events of every part, keyed by partition name in part order
///
/// A part whose name is already taken gets `_` appended until it is unique.
pub fn extract_events(score: &Score) -> Vec<PartitionEvents> {
    let mut partitions: Vec<PartitionEvents> = Vec::with_capacity(score.parts.len());
    for part in &score.parts {
        let name = unique_name(&part.name, partitions.iter().map(|p| p.name.as_str()));
        partitions.push(PartitionEvents { name, measures: process_part(part) });
    }
    partitions
}

/// Append `_` to `name` until no existing name matches
pub(crate) fn unique_name<'a>(name: &str, existing: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut candidate = name.to_string();
    while existing.clone().any(|taken| taken == candidate) {
        candidate.push('_');
    }
    candidate
}

fn process_part(part: &Part) -> Vec<Vec<Event>> {
    part.measures.iter().map(process_measure).collect()
}

fn process_measure(measure: &Measure) -> Vec<Event> {
    measure.elements.iter().filter_map(process_element).collect()
}

/// The one place element kinds map to events
pub fn process_element(element: &Element) -> Option<Event> {
    match element {
        Element::Note(note) => Some(process_note(note)),
        Element::Rest(rest) => Some(process_rest(rest)),
        Element::Chord(chord) => Some(process_chord(chord)),
        Element::Other { kind } => {
            log::trace!("Dropping {} element", kind);
            None
        }
    }
}

fn process_note(note: &Note) -> Event {
    Event::Note {
        pitch: note.pitch.name_with_octave(),
        duration: quarter_length_to_f64(note.duration),
    }
}

fn process_rest(rest: &Rest) -> Event {
    Event::Rest { duration: quarter_length_to_f64(rest.duration) }
}

fn process_chord(chord: &Chord) -> Event {
    Event::Chord {
        pitches: chord.notes.iter().map(|n| n.pitch.name_with_octave()).collect(),
        duration: quarter_length_to_f64(chord.duration),
    }
}
