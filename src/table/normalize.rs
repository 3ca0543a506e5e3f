//! Wide-to-long normalization of extracted corpora

use super::literal::{render_event, PLACEHOLDER_LITERAL};
use super::{Row, MISSING_DURATION};
use crate::extract::{format_duration, CorpusTable};

/// Flatten several corpora into one table with `node_id` dense across all of them
pub fn normalize(tables: &[CorpusTable]) -> Vec<Row> {
    let mut next_node_id = 0u64;
    let mut rows = Vec::new();
    for table in tables {
        rows.extend(normalize_corpus(table, &mut next_node_id));
    }
    rows
}

/// Melt one corpus: partition by partition, measure by measure, event by event
///
/// Every pitch of a chord becomes its own row with the chord's duration. A
/// measure with no events yields one placeholder row (no pitch, duration
/// `nan`) so measure alignment across partitions survives. `next_node_id`
/// is advanced by one per emitted row.
pub fn normalize_corpus(table: &CorpusTable, next_node_id: &mut u64) -> Vec<Row> {
    let mut rows = Vec::new();

    for partition in &table.partitions {
        for (measure, events) in partition.measures.iter().enumerate() {
            let mut push = |notes: String, pitch: Option<String>, duration: String| {
                rows.push(Row {
                    corpus: table.corpus.clone(),
                    measure: measure as u32,
                    composer: table.composer.clone(),
                    partition: partition.name.clone(),
                    notes,
                    node_id: *next_node_id,
                    pitch,
                    duration,
                });
                *next_node_id += 1;
            };

            if events.is_empty() {
                push(PLACEHOLDER_LITERAL.to_string(), None, MISSING_DURATION.to_string());
                continue;
            }

            for event in events {
                let notes = render_event(event);
                let duration = format_duration(event.duration());
                for pitch in event.pitch_labels() {
                    push(notes.clone(), Some(pitch.to_string()), duration.clone());
                }
            }
        }
    }

    log::debug!("Normalized {} into {} rows", table.corpus, rows.len());
    rows
}
