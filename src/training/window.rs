//! Fixed-length sliding windows, stride 1

use crate::table::Row;
use std::collections::HashMap;

/// All windows of `length` consecutive items, in order
///
/// Yields `max(0, items.len() - length + 1)` windows; a zero `length` gives
/// `items.len() + 1` empty windows.
///
/// ```
/// use scoreseq::training::generate_windows;
///
/// let rows = ["A", "B", "C", "D"];
/// assert_eq!(generate_windows(&rows, 2), vec![vec!["A", "B"], vec!["B", "C"], vec!["C", "D"]]);
/// assert!(generate_windows(&rows, 5).is_empty());
/// ```
pub fn generate_windows<T: Clone>(items: &[T], length: usize) -> Vec<Vec<T>> {
    match length {
        0 => vec![Vec::new(); items.len() + 1],
        n if n > items.len() => Vec::new(),
        n => items.windows(n).map(<[T]>::to_vec).collect(),
    }
}

/// Pitch and duration windows, positionally aligned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Windows {
    pub pitches: Vec<Vec<String>>,
    pub durations: Vec<Vec<String>>,
}

impl Windows {
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}

/// Group rows by corpus in order of first appearance, keeping row order within each
pub fn group_by_corpus(rows: &[Row]) -> Vec<(&str, Vec<&Row>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Row>)> = Vec::new();
    for row in rows {
        let slot = *index.entry(row.corpus.as_str()).or_insert_with(|| {
            groups.push((row.corpus.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }
    groups
}

/// Window each corpus separately so no window spans two corpora
///
/// Window `i` of `pitches` and window `i` of `durations` cover the same rows.
/// Corpora shorter than `length` contribute nothing.
pub fn slice_corpora(rows: &[Row], length: usize) -> Windows {
    let mut windows = Windows::default();
    for (corpus, group) in group_by_corpus(rows) {
        let pitches: Vec<String> = group.iter().map(|r| r.pitch.clone().unwrap_or_default()).collect();
        let durations: Vec<String> = group.iter().map(|r| r.duration.clone()).collect();

        let pitch_windows = generate_windows(&pitches, length);
        let duration_windows = generate_windows(&durations, length);
        log::debug!("{}: {} rows, {} windows", corpus, group.len(), pitch_windows.len());

        windows.pitches.extend(pitch_windows);
        windows.durations.extend(duration_windows);
    }
    windows
}
