//! Corpus denylist and rest fill

use super::Row;
use crate::extract::REST_MARKER;
use std::collections::HashSet;

/// Corpora known to be malformed in the Bach corpus
pub const DEFAULT_DENYLIST: [&str; 3] = ["bwv248.9-1", "bwv846", "bwv248.23-2"];

/// Drops denylisted corpora and turns missing pitches into rests
#[derive(Debug, Clone)]
pub struct CorpusFilter {
    denylist: HashSet<String>,
}

impl Default for CorpusFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().map(|s| s.to_string()))
    }
}

impl CorpusFilter {
    pub fn new(denylist: impl IntoIterator<Item = String>) -> Self {
        Self { denylist: denylist.into_iter().collect() }
    }

    pub fn is_denied(&self, corpus: &str) -> bool {
        self.denylist.contains(corpus)
    }

    /// Exact identifier match only; nothing else about a row is validated
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        let before = rows.len();
        let mut filled = 0usize;

        let rows: Vec<Row> = rows
            .into_iter()
            .filter(|row| !self.is_denied(&row.corpus))
            .map(|mut row| {
                if row.pitch.is_none() {
                    row.pitch = Some(REST_MARKER.to_string());
                    filled += 1;
                }
                row
            })
            .collect();

        log::info!(
            "Corpus filter removed {} of {} rows, filled {} missing pitches",
            before - rows.len(),
            before,
            filled
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(corpus: &str, pitch: Option<&str>) -> Row {
        Row {
            corpus: corpus.to_string(),
            measure: 0,
            composer: "bach".to_string(),
            partition: "tenor".to_string(),
            notes: String::new(),
            node_id: 0,
            pitch: pitch.map(str::to_string),
            duration: "1.0000".to_string(),
        }
    }

    #[test]
    fn test_denylisted_corpora_are_removed() {
        let rows = vec![
            row("bwv846", Some("C4")),
            row("bwv66.6", Some("D4")),
            row("bwv248.9-1", Some("E4")),
            row("bwv248.23-2", None),
            row("bwv8466", Some("F4")),
        ];

        let kept = CorpusFilter::default().apply(rows);
        let corpora: Vec<&str> = kept.iter().map(|r| r.corpus.as_str()).collect();
        assert_eq!(corpora, vec!["bwv66.6", "bwv8466"]);
        assert!(kept.iter().all(|r| !DEFAULT_DENYLIST.contains(&r.corpus.as_str())));
    }

    #[test]
    fn test_missing_pitch_becomes_rest() {
        let kept = CorpusFilter::default().apply(vec![row("bwv1", None), row("bwv1", Some("G4"))]);
        assert_eq!(kept[0].pitch.as_deref(), Some("P"));
        assert_eq!(kept[1].pitch.as_deref(), Some("G4"));
    }

    #[test]
    fn test_custom_denylist() {
        let filter = CorpusFilter::new(vec!["bwv1".to_string()]);
        assert!(filter.is_denied("bwv1"));
        assert!(!filter.is_denied("bwv846"));
        assert_eq!(filter.apply(vec![row("bwv1", None)]).len(), 0);
    }
}
